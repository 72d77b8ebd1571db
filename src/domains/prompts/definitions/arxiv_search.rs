//! Paper search prompt.

use super::PromptDefinition;
use rmcp::model::PromptArgument;

pub struct ArxivSearchPrompt;

impl PromptDefinition for ArxivSearchPrompt {
    const NAME: &'static str = "arxiv_search_prompt";
    const DESCRIPTION: &'static str = "Create a prompt to search for scientific papers";

    fn template() -> &'static str {
        "I'll search for scientific papers related to: {{query}}\n\n\
         I'll use the arxiv_search_papers tool to find relevant papers on arXiv.org.\n\
         After finding interesting papers, I can download them using the arxiv_download_paper tool."
    }

    fn arguments() -> Vec<PromptArgument> {
        vec![PromptArgument {
            name: "query".to_string(),
            title: None,
            description: Some("Topic or arXiv query to search for".to_string()),
            required: Some(true),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_prompt_metadata() {
        assert_eq!(ArxivSearchPrompt::NAME, "arxiv_search_prompt");
        assert!(ArxivSearchPrompt::template().contains("arxiv_search_papers"));

        let args = ArxivSearchPrompt::arguments();
        assert_eq!(args.len(), 1);
        assert_eq!(args[0].name, "query");
        assert_eq!(args[0].required, Some(true));
    }
}
