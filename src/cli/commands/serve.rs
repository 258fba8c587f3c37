//! Gateway server command.

use std::sync::Arc;

use tokio::runtime::Runtime;

use super::build_gateway;
use crate::config::Config;
use crate::gateway::server;

/// Serve `/api/manager` until Ctrl-C
pub fn cmd_serve(rt: &Runtime, config: &Config, bind: Option<&str>) -> anyhow::Result<()> {
    let bind = bind.unwrap_or(&config.server.bind);
    let gateway = Arc::new(build_gateway(config));

    println!("Serving gateway on http://{}", bind);
    rt.block_on(server::serve(gateway, bind))?;
    Ok(())
}
