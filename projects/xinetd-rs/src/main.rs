//! xinetd-attrs — run service attribute lines through the xinetd validators
//!
//! Every input line has the form `keyword op values...` where `op` is one of
//! `=`, `+=` or `-=`, exactly like the inside of a service block in
//! xinetd.conf. Lines starting with '#' are comments, empty lines are
//! ignored. All lines are applied to one service record, which is printed as
//! JSON on stdout.
//!
//! The exit code is non-zero if any line was rejected.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use xinetd_rs::attributes::{AssignOp, ParseContext, Section, apply_attribute_in};
use xinetd_rs::config::load_config;
use xinetd_rs::logging::setup_logging;
use xinetd_rs::service_config::ServiceConfig;

/// Check xinetd service attributes and print the resulting record
#[derive(Parser, Debug)]
#[command(name = "xinetd-attrs", version, about)]
struct Cli {
    /// TOML file with logging and parser settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Name of the service the lines belong to
    #[arg(long, default_value = "service")]
    name: String,

    /// Treat the lines as the contents of the `defaults` block
    #[arg(long)]
    defaults: bool,

    /// Files with attribute lines, stdin if none are given
    files: Vec<PathBuf>,
}

/// One attribute line, split into keyword, operator and value tokens.
#[derive(Debug, PartialEq, Eq)]
struct AttributeLine<'a> {
    keyword: &'a str,
    op: AssignOp,
    values: Vec<&'a str>,
}

fn split_line(line: &str) -> Result<AttributeLine<'_>, String> {
    let eq = line
        .find('=')
        .ok_or_else(|| format!("missing assignment operator in: {line}"))?;
    let (head, op) = match line[..eq].chars().last() {
        Some('+') => (&line[..eq - 1], AssignOp::Add),
        Some('-') => (&line[..eq - 1], AssignOp::Remove),
        _ => (&line[..eq], AssignOp::Set),
    };
    let keyword = head.trim();
    if keyword.is_empty() || keyword.contains(char::is_whitespace) {
        return Err(format!("bad attribute name in: {line}"));
    }
    Ok(AttributeLine {
        keyword,
        op,
        values: line[eq + 1..].split_whitespace().collect(),
    })
}

fn apply_lines(
    source: &str,
    content: &str,
    section: Section,
    record: &mut ServiceConfig,
    ctx: &ParseContext,
) -> usize {
    let mut failures = 0;
    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parsed = match split_line(line) {
            Ok(parsed) => parsed,
            Err(e) => {
                error!("{source}:{}: {e}", idx + 1);
                failures += 1;
                continue;
            }
        };
        // apply_attribute_in already logged the reason
        if apply_attribute_in(section, parsed.keyword, parsed.op, &parsed.values, record, ctx).is_err() {
            error!("{source}:{}: rejected {}", idx + 1, parsed.keyword);
            failures += 1;
        }
    }
    failures
}

fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content)?;
            Ok(content)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (log_conf, settings) = match load_config(cli.config.as_deref()) {
        Ok(conf) => conf,
        Err(e) => {
            eprintln!("xinetd-attrs: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = setup_logging(&log_conf) {
        eprintln!("xinetd-attrs: {e}");
        return ExitCode::FAILURE;
    }

    let ctx = ParseContext::new(settings);
    let section = if cli.defaults {
        Section::Defaults
    } else {
        Section::Service
    };
    let mut record = ServiceConfig::new(&cli.name);

    let inputs: Vec<Option<&Path>> = if cli.files.is_empty() {
        vec![None]
    } else {
        cli.files.iter().map(|p| Some(p.as_path())).collect()
    };

    let mut failures = 0;
    for input in inputs {
        let source = input.map_or_else(|| "<stdin>".to_owned(), |p| p.display().to_string());
        match read_input(input) {
            Ok(content) => {
                failures += apply_lines(&source, &content, section, &mut record, &ctx);
            }
            Err(e) => {
                error!("Could not read {source}: {e}");
                failures += 1;
            }
        }
    }

    match serde_json::to_string_pretty(&record) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!("Could not serialize the service record: {e}");
            return ExitCode::FAILURE;
        }
    }

    if failures > 0 {
        info!("{failures} attribute line(s) rejected");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators_are_split_off() {
        let line = split_line("server_args += -l -a").unwrap();
        assert_eq!(line.keyword, "server_args");
        assert_eq!(line.op, AssignOp::Add);
        assert_eq!(line.values, vec!["-l", "-a"]);

        let line = split_line("env = PATH=/bin").unwrap();
        assert_eq!(line.op, AssignOp::Set);
        assert_eq!(line.values, vec!["PATH=/bin"]);

        let line = split_line("only_from-=10.0.0.0").unwrap();
        assert_eq!(line.keyword, "only_from");
        assert_eq!(line.op, AssignOp::Remove);
    }

    #[test]
    fn malformed_lines() {
        assert!(split_line("port 23").is_err());
        assert!(split_line("= 23").is_err());
        assert!(split_line("two words = 1").is_err());
    }
}
