//! Subcommand implementations.

use crate::cli::{Commands, Limits};
use crate::emit::Emitter;
use crate::error::ToolError;
use crate::input::{LexerSource, read_file};
use crate::visualize::generate_dot;
use mll::LexerTables;
use std::path::{Path, PathBuf};

/// Run one subcommand to completion.
///
/// # Errors
///
/// Returns the first failure: unreadable or malformed input, a generation
/// error, or a failed write.
pub fn run(command: Commands) -> Result<(), ToolError> {
    match command {
        Commands::Generate {
            input,
            out_dir,
            name,
            limits,
        } => {
            let (source, tables) = load(&input, limits)?;
            let base_name = match name {
                Some(name) => name,
                None => default_base_name(&input),
            };
            let emitter = Emitter::new(&tables, &source.manifest, &base_name)?;
            let (header, source) = emitter
                .write_to(&out_dir)
                .map_err(|(path, err)| ToolError::io(path, err))?;
            println!("Wrote {} and {}", header.display(), source.display());
        }
        Commands::Dot { input, output, limits } => {
            let (_, tables) = load(&input, limits)?;
            write_output(output.as_deref(), &generate_dot(&tables))?;
        }
        Commands::Tables { input, output, limits } => {
            let (_, tables) = load(&input, limits)?;
            let mut json = serde_json::to_string_pretty(&tables)?;
            json.push('\n');
            write_output(output.as_deref(), &json)?;
        }
    }
    Ok(())
}

/// Read an `.mll` file and build its tables.
///
/// # Errors
///
/// Fails on I/O, malformed input or a generation error.
pub fn load(input: &Path, limits: Limits) -> Result<(LexerSource, LexerTables), ToolError> {
    let source = read_file(input)?;
    let tables = source.generator(limits.config()).build()?;
    log::info!(
        "{}: {} patterns, {} DFA states",
        input.display(),
        tables.patterns().len(),
        tables.dfa().len()
    );
    Ok((source, tables))
}

fn default_base_name(input: &Path) -> String {
    input
        .file_stem()
        .map_or_else(|| "lexer".to_owned(), |stem| stem.to_string_lossy().into_owned())
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), ToolError> {
    match output {
        Some(path) => {
            std::fs::write(path, content).map_err(|err| ToolError::io(PathBuf::from(path), err))?;
            log::info!("wrote {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_name() {
        assert_eq!(default_base_name(Path::new("dir/scanner.mll")), "scanner");
        assert_eq!(default_base_name(Path::new("/")), "lexer");
    }
}
