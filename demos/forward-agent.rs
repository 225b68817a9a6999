//! Serve one key to every connection of a Unix socket, as if each
//! connection were a forwarded agent channel.
//!
//! ```sh
//! cargo run --example forward-agent -- --key ~/.ssh/id_rsa --socket /tmp/agent.sock
//! SSH_AUTH_SOCK=/tmp/agent.sock ssh-add -l
//! ```

#[cfg(unix)]
mod unix {
    use std::path::PathBuf;
    use std::sync::Arc;

    use clap::Parser;
    use log::info;
    use ssh_agent_forward::{agent::Agent, config::AgentConfig, identity::KeypairIdentity};
    use testresult::TestResult;
    use tokio::net::UnixListener;

    #[derive(Debug, Parser)]
    struct Args {
        /// Unencrypted OpenSSH private key to serve.
        #[clap(short, long)]
        key: PathBuf,

        /// Socket path to listen on.
        #[clap(short, long, default_value = "forward-agent.sock")]
        socket: PathBuf,

        /// Comment listed with the key.
        #[clap(long)]
        comment: Option<String>,

        /// Do not pause between responses.
        #[clap(long)]
        unpaced: bool,
    }

    pub async fn main() -> TestResult {
        env_logger::init();

        let args = Args::parse();
        let identity = KeypairIdentity::from_openssh(std::fs::read(&args.key)?)?;

        let mut config = if args.unpaced {
            AgentConfig::unpaced()
        } else {
            AgentConfig::default()
        };
        if let Some(comment) = args.comment {
            config = config.with_comment(comment);
        }
        let agent = Agent::new(Arc::new(identity), config);

        let _ = std::fs::remove_file(&args.socket);
        let listener = UnixListener::bind(&args.socket)?;
        info!("Listening on {}", args.socket.display());

        loop {
            let (channel, _) = listener.accept().await?;
            agent.spawn(channel);
        }
    }
}

#[cfg(unix)]
#[tokio::main]
async fn main() -> testresult::TestResult {
    unix::main().await
}

#[cfg(windows)]
fn main() {
    eprintln!("This example needs Unix domain sockets");
}
