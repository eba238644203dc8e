//! hotstuff - release installer and live-reload client
//!
//! This library provides the two engineered halves of hotstuff:
//!
//! - [`release`] and [`manager`]: resolve the host platform, locate the
//!   matching prebuilt release archive, fetch it and extract it in place.
//! - [`livereload`]: track the assets a served page has loaded and patch or
//!   reload them as the development server reports changes.

pub mod livereload;
pub mod manager;
pub mod release;
