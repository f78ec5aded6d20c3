//! Server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::playback::DEFAULT_SPEED_MS;

/// Configuration for the visualization server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisConfig {
    /// Address to bind
    pub bind: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Initial playback delay in milliseconds
    pub default_speed_ms: u64,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            default_speed_ms: DEFAULT_SPEED_MS,
        }
    }
}

impl VisConfig {
    /// Read positional arguments `[port] [speed_ms]`, skipping the program
    /// name. Missing or unparsable values keep their defaults.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let defaults = Self::default();
        let mut args = args.into_iter().skip(1);

        let port = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let default_speed_ms = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.default_speed_ms);

        Self {
            port,
            default_speed_ms,
            ..defaults
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("stepgraph-vis")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn defaults_without_args() {
        let config = VisConfig::from_args(args(&[]));
        assert_eq!(config, VisConfig::default());
        assert_eq!(config.addr().port(), 3000);
    }

    #[test]
    fn positional_port_and_speed() {
        let config = VisConfig::from_args(args(&["8080", "250"]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_speed_ms, 250);
    }

    #[test]
    fn bad_values_fall_back() {
        let config = VisConfig::from_args(args(&["not-a-port", "fast"]));
        assert_eq!(config.port, 3000);
        assert_eq!(config.default_speed_ms, DEFAULT_SPEED_MS);
    }
}
