//! Host platform resolution for release downloads.
//!
//! Releases are only built for a fixed set of targets. The host's OS and CPU
//! architecture (as reported by [`std::env::consts`]) must match one of them
//! exactly; anything else is a permanent failure for this run.

use std::fmt;

/// A platform that prebuilt releases exist for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedPlatform {
    /// Operating system identifier (e.g. "linux").
    pub os_type: &'static str,
    /// CPU architecture identifier (e.g. "x86_64").
    pub architecture: &'static str,
    /// Rust target triple the release archive is built for.
    pub target_triple: &'static str,
}

/// Every platform a release archive is published for.
pub const SUPPORTED_PLATFORMS: &[SupportedPlatform] = &[
    SupportedPlatform {
        os_type: "windows",
        architecture: "x86_64",
        target_triple: "x86_64-pc-windows-msvc",
    },
    SupportedPlatform {
        os_type: "linux",
        architecture: "x86_64",
        target_triple: "x86_64-unknown-linux-musl",
    },
    SupportedPlatform {
        os_type: "macos",
        architecture: "x86_64",
        target_triple: "x86_64-apple-darwin",
    },
];

/// The OS and architecture of the machine running the installer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPlatform {
    os_type: String,
    architecture: String,
}

impl HostPlatform {
    /// Create a host description from explicit identifiers.
    pub fn new(os_type: impl Into<String>, architecture: impl Into<String>) -> Self {
        Self {
            os_type: os_type.into(),
            architecture: architecture.into(),
        }
    }

    /// Detect the current host.
    pub fn detect() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    pub fn os_type(&self) -> &str {
        &self.os_type
    }

    pub fn architecture(&self) -> &str {
        &self.architecture
    }

    /// Resolve this host against the published platform set.
    pub fn resolve(&self) -> Result<&'static SupportedPlatform, UnsupportedPlatform> {
        resolve_in(self, SUPPORTED_PLATFORMS)
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os_type, self.architecture)
    }
}

/// Look up `host` in `platforms`, requiring an exact match on both fields.
pub fn resolve_in<'a>(
    host: &HostPlatform,
    platforms: &'a [SupportedPlatform],
) -> Result<&'a SupportedPlatform, UnsupportedPlatform> {
    platforms
        .iter()
        .find(|p| p.os_type == host.os_type && p.architecture == host.architecture)
        .ok_or_else(|| UnsupportedPlatform {
            host: host.clone(),
            supported: platforms.to_vec(),
        })
}

/// The host matched none of the supported platforms.
///
/// The `Display` output is the full user-facing diagnostic, including a table
/// of every supported platform so the user can see what would have worked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedPlatform {
    host: HostPlatform,
    supported: Vec<SupportedPlatform>,
}

impl UnsupportedPlatform {
    pub fn host(&self) -> &HostPlatform {
        &self.host
    }

    pub fn supported(&self) -> &[SupportedPlatform] {
        &self.supported
    }
}

impl fmt::Display for UnsupportedPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "platform with type \"{}\" and architecture \"{}\" is not supported.",
            self.host.os_type, self.host.architecture
        )?;
        writeln!(f, "Your system must be one of the following:")?;
        writeln!(f)?;
        write!(f, "{}", format_platform_table(&self.supported))
    }
}

impl std::error::Error for UnsupportedPlatform {}

/// Render platforms as an aligned TYPE / ARCHITECTURE / TARGET table.
pub fn format_platform_table(platforms: &[SupportedPlatform]) -> String {
    const HEADERS: [&str; 3] = ["TYPE", "ARCHITECTURE", "TARGET"];

    let os_width = platforms
        .iter()
        .map(|p| p.os_type.len())
        .chain([HEADERS[0].len()])
        .max()
        .unwrap_or(0);
    let arch_width = platforms
        .iter()
        .map(|p| p.architecture.len())
        .chain([HEADERS[1].len()])
        .max()
        .unwrap_or(0);
    let target_width = platforms
        .iter()
        .map(|p| p.target_triple.len())
        .chain([HEADERS[2].len()])
        .max()
        .unwrap_or(0);

    let mut table = format!(
        "{:<os_width$}  {:<arch_width$}  {}\n",
        HEADERS[0], HEADERS[1], HEADERS[2]
    );
    table.push_str(&"=".repeat(os_width + arch_width + target_width + 4));
    table.push('\n');

    for p in platforms {
        table.push_str(&format!(
            "{:<os_width$}  {:<arch_width$}  {}\n",
            p.os_type, p.architecture, p.target_triple
        ));
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_supported_pair_resolves_to_its_triple() {
        for platform in SUPPORTED_PLATFORMS {
            let host = HostPlatform::new(platform.os_type, platform.architecture);
            let resolved = host.resolve().unwrap();
            assert_eq!(resolved.target_triple, platform.target_triple);
        }
    }

    #[test]
    fn test_unsupported_architecture() {
        let host = HostPlatform::new("linux", "aarch64");
        let err = host.resolve().unwrap_err();

        assert_eq!(err.host(), &host);
        assert_eq!(err.supported(), SUPPORTED_PLATFORMS);
    }

    #[test]
    fn test_partial_match_is_not_enough() {
        // OS of one entry combined with the architecture of none
        assert!(HostPlatform::new("macos", "arm").resolve().is_err());
        assert!(HostPlatform::new("freebsd", "x86_64").resolve().is_err());
    }

    #[test]
    fn test_diagnostic_lists_every_supported_tuple() {
        let err = HostPlatform::new("freebsd", "riscv64").resolve().unwrap_err();
        let message = err.to_string();

        assert!(message.contains("\"freebsd\""));
        assert!(message.contains("\"riscv64\""));
        for p in SUPPORTED_PLATFORMS {
            let row = message
                .lines()
                .find(|line| line.contains(p.target_triple))
                .unwrap_or_else(|| panic!("missing row for {}", p.target_triple));
            assert!(row.starts_with(p.os_type));
            assert!(row.contains(p.architecture));
        }
    }

    #[test]
    fn test_table_columns_are_aligned() {
        let table = format_platform_table(SUPPORTED_PLATFORMS);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), SUPPORTED_PLATFORMS.len() + 2);
        assert!(lines[0].starts_with("TYPE"));
        assert!(lines[1].chars().all(|c| c == '='));

        let target_column = lines[0].find("TARGET").unwrap();
        for row in &lines[2..] {
            assert_eq!(row.find("x86_64-").unwrap(), target_column);
        }
    }

    #[test]
    fn test_resolve_in_custom_table() {
        let table = [SupportedPlatform {
            os_type: "linux",
            architecture: "aarch64",
            target_triple: "aarch64-unknown-linux-musl",
        }];
        let host = HostPlatform::new("linux", "aarch64");
        assert_eq!(
            resolve_in(&host, &table).unwrap().target_triple,
            "aarch64-unknown-linux-musl"
        );
    }

    #[test]
    fn test_detect_matches_std_consts() {
        let host = HostPlatform::detect();
        assert_eq!(host.os_type(), std::env::consts::OS);
        assert_eq!(host.architecture(), std::env::consts::ARCH);
        assert_eq!(
            host.to_string(),
            format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH)
        );
    }
}
