use anyhow::Result;
use tracing::info;

use crate::cli::ShowArgs;
use crate::loader::load_report_path;
use crate::render::{ToggleHints, ViewState, render};
use crate::util::write_output;

pub fn run(args: ShowArgs) -> Result<()> {
    let report = load_report_path(&args.file)?;
    let view = view_state_from_args(&args);

    let rendered = render(&report, &view, args.view, args.format, ToggleHints::CLI)?;
    write_output(args.output.as_deref(), &rendered)?;

    if let Some(output) = &args.output {
        info!(
            path = %output.display(),
            view = args.view.as_str(),
            format = args.format.as_str(),
            "wrote rendered report"
        );
    }

    Ok(())
}

fn view_state_from_args(args: &ShowArgs) -> ViewState {
    ViewState {
        expanded_chunks: args
            .expand_chunks
            .iter()
            .map(|number| (*number as usize).saturating_sub(1))
            .collect(),
        expand_all: args.expand_all,
        show_details: args.details,
        show_prompt: args.show_prompt,
        show_sql_facts: args.show_sql_facts,
        show_llm_summary: args.show_llm_summary,
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Commands};

    #[test]
    fn chunk_numbers_become_zero_based_indices() {
        let cli = Cli::try_parse_from([
            "valreport",
            "show",
            "r.json",
            "--expand-chunk",
            "1",
            "--expand-chunk",
            "3",
            "--show-prompt",
        ])
        .expect("args parse");
        let Commands::Show(args) = cli.command else {
            panic!("expected show command");
        };

        let view = view_state_from_args(&args);
        assert!(view.is_chunk_expanded(0));
        assert!(!view.is_chunk_expanded(1));
        assert!(view.is_chunk_expanded(2));
        assert!(view.show_prompt);
        assert!(!view.show_details);
    }
}
