//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! The stdio and tcp transports are served by rmcp itself, which dispatches
//! through a `ToolRouter`. One dynamic route is created per registered
//! handler so both dispatch paths share the same tool set.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter};

use super::{ToolHandler, ToolRegistry};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(registry: &ToolRegistry) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    registry
        .handlers()
        .fold(ToolRouter::new(), |router, handler| {
            router.with_route(create_route(handler.clone()))
        })
}

fn create_route<S>(handler: Arc<dyn ToolHandler>) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    ToolRoute::new_dyn(handler.to_tool(), move |ctx: ToolCallContext<'_, S>| {
        let handler = handler.clone();
        let args = ctx.arguments.clone().unwrap_or_default();
        async move { handler.call(args).await.map_err(|e| e.into_mcp_error()) }.boxed()
    })
}
