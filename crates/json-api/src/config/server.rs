//! Server Config

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Args;

/// Where the cart API listens.
#[derive(Debug, Args)]
pub struct ServerRuntimeConfig {
    /// IP address to bind; hostnames are rejected at startup
    #[arg(short = 'H', long, env = "SERVER_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// TCP port to bind
    #[arg(short, long, env = "SERVER_PORT", default_value = "8698")]
    pub port: u16,
}

impl ServerRuntimeConfig {
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        server: ServerRuntimeConfig,
    }

    #[test]
    fn binds_every_interface_by_default() -> TestResult {
        let cli = Cli::try_parse_from(["trolley-json"])?;

        assert_eq!(
            cli.server.socket_addr(),
            SocketAddr::from(([0, 0, 0, 0], 8698))
        );

        Ok(())
    }

    #[test]
    fn accepts_ipv6_hosts() -> TestResult {
        let cli = Cli::try_parse_from(["trolley-json", "--host", "::1", "--port", "9000"])?;

        assert_eq!(cli.server.socket_addr().to_string(), "[::1]:9000");

        Ok(())
    }

    #[test]
    fn rejects_hostnames() {
        let result = Cli::try_parse_from(["trolley-json", "--host", "localhost"]);

        assert!(result.is_err(), "host must be an IP address");
    }
}
