//! Static tuberculosis awareness text.

use async_trait::async_trait;
use rmcp::model::CallToolResult;

use crate::domains::tools::{ToolDefinition, ToolRegistry};

use super::common::{NoParams, text_result};

pub const ABOUT_TB: &str = "
🩺 Thank you for your message!

**Tuberculosis (TB) Risk Factors:**
- Living or traveling in high-risk areas
- Close contact with infected individuals
- Weakened immune system (HIV/AIDS, malnutrition)
- Crowded or poorly ventilated living conditions

➡️ Early detection and treatment are key!
";

/// `about_tb`
pub struct AboutTbTool;

#[async_trait]
impl ToolDefinition for AboutTbTool {
    const NAME: &'static str = "about_tb";
    const DESCRIPTION: &'static str = "General awareness about TB";
    type Params = NoParams;

    async fn execute(&self, _params: NoParams) -> CallToolResult {
        text_result(ABOUT_TB)
    }
}

pub fn register(registry: &mut ToolRegistry) {
    registry.register(AboutTbTool);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::result_text;

    #[tokio::test]
    async fn test_about_tb_registered_once() {
        let mut registry = ToolRegistry::new();
        register(&mut registry);
        register(&mut registry);
        assert_eq!(registry.len(), 1);

        let text = result_text(&AboutTbTool.execute(NoParams {}).await);
        assert!(text.contains("Tuberculosis (TB) Risk Factors"));
    }
}
