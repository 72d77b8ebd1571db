//! Detect-then-rename walkthrough for a folder of papers.

use super::PromptDefinition;
use rmcp::model::PromptArgument;

pub struct ArxivProcessDirectoryPrompt;

impl PromptDefinition for ArxivProcessDirectoryPrompt {
    const NAME: &'static str = "arxiv_process_directory";
    const DESCRIPTION: &'static str = "Create a prompt to process a directory of arXiv papers";

    fn template() -> &'static str {
        "I'll help you organize arXiv papers in \
         {{#if directory_path}}{{directory_path}}{{else}}~/Downloads{{/if}}.\n\n\
         First, I'll use the arxiv_detect_directory tool to check for arXiv papers.\n\
         Then, I'll use the arxiv_rename_papers tool to rename any papers I find based on their titles.\n\n\
         Let me start by checking the directory for arXiv papers..."
    }

    fn arguments() -> Vec<PromptArgument> {
        vec![PromptArgument {
            name: "directory_path".to_string(),
            title: None,
            description: Some("Folder to scan (default: ~/Downloads)".to_string()),
            required: Some(false),
        }]
    }
}
