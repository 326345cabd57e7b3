use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use logger::Logger;
use on_demand_imports::{transform_source, TransformJSONConfig, VisitorAdapter};
use path_slash::PathExt;

pub const DEFAULT_CONFIG_PATH: &str = "on-demand-imports.json";

/// Rewrites barrel imports of component libraries into per-module imports.
#[derive(Parser, Debug)]
#[command(name = "on-demand-imports")]
pub struct CliArgs {
    /// JSON or HJSON file describing the libraries to rewrite
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config_path: String,

    /// Rewrite files in place instead of printing them to stdout
    #[arg(short, long)]
    pub write: bool,

    /// Print the JSON schema of the config file and exit
    #[arg(long)]
    pub print_schema: bool,

    pub files: Vec<PathBuf>,
}

/// Accepts plain JSON as well, since HJSON is a superset of it.
pub fn parse_config(config_str: &str) -> Result<TransformJSONConfig> {
    serde_hjson::from_str(config_str).context("Failed to parse on-demand-imports config")
}

pub fn config_schema() -> Result<String> {
    let schema = schemars::schema_for!(TransformJSONConfig);
    Ok(serde_json::to_string_pretty(&schema)?)
}

fn transform_file(
    path: &Path,
    adapter: &VisitorAdapter,
    write: bool,
    logger: impl Logger,
) -> Result<()> {
    let name = path.to_slash_lossy().to_string();
    let src = fs::read_to_string(path).with_context(|| format!("Failed to read {}", name))?;
    let result = transform_source(&name, &src, adapter, logger.clone())?;

    if !write {
        print!("{}", result.code);
        return Ok(());
    }
    if result.report.removed_imports == 0 && result.report.injected_imports.is_empty() {
        logger.log(format!("{}: unchanged", name));
        return Ok(());
    }
    fs::write(path, result.code).with_context(|| format!("Failed to write {}", name))?;
    logger.log(format!(
        "{}: injected {} imports, removed {} barrel imports",
        name,
        result.report.injected_imports.len(),
        result.report.removed_imports
    ));
    Ok(())
}

pub fn run(args: CliArgs, logger: impl Logger) -> Result<()> {
    if args.print_schema {
        println!("{}", config_schema()?);
        return Ok(());
    }

    logger::debug_logf!(logger, "reading config from {}", args.config_path);
    let config_str = fs::read_to_string(&args.config_path)
        .with_context(|| format!("Failed to read config file: {}", args.config_path))?;
    let config = parse_config(&config_str)?;
    let adapter = VisitorAdapter::from_json_config(config)
        .with_context(|| format!("Invalid config in {}", args.config_path))?;

    // one bad file does not stop the rest from being rewritten
    let mut failures = 0;
    for file in &args.files {
        if let Err(err) = transform_file(file, &adapter, args.write, logger.clone()) {
            logger.error(format!("{:#}", err));
            failures += 1;
        }
    }

    if failures > 0 {
        return Err(anyhow!(
            "{} of {} files could not be transformed",
            failures,
            args.files.len()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use clap::Parser;
    use logger::VecLogger;
    use on_demand_imports::EngineConfig;
    use pretty_assertions::assert_eq;
    use test_tmpdir::test_tmpdir;

    use super::{config_schema, parse_config, run, CliArgs, DEFAULT_CONFIG_PATH};

    #[test]
    fn test_parse_json_config() {
        let config = parse_config(
            r#"{ "libraries": [{ "libraryName": "uilib", "style": true }] }"#,
        )
        .unwrap();
        assert_eq!(
            config.into_engine_configs().unwrap(),
            vec![EngineConfig::new("uilib").with_styles(true)]
        );
    }

    #[test]
    fn test_parse_hjson_config() {
        let config = parse_config(
            r#"
            {
              # dash-separated component directories
              libraryName: icons
              libraryDirectory: es/icons
              componentNameSeparator: "-"
            }
            "#,
        )
        .unwrap();
        assert_eq!(
            config.into_engine_configs().unwrap(),
            vec![EngineConfig::new("icons")
                .with_library_directory("es/icons")
                .with_separator("-")]
        );
    }

    #[test]
    fn test_args() {
        let args = CliArgs::try_parse_from(["on-demand-imports", "--write", "a.ts", "b.tsx"])
            .unwrap();
        assert_eq!(args.config_path, DEFAULT_CONFIG_PATH);
        assert!(args.write);
        assert_eq!(args.files.len(), 2);
    }

    #[test]
    fn test_schema_names_library_fields() {
        let schema = config_schema().unwrap();
        assert!(schema.contains("libraryName"));
        assert!(schema.contains("componentNameSeparator"));
    }

    #[test]
    fn test_run_rewrites_in_place() {
        let tmpdir = test_tmpdir!(
            "on-demand-imports.json" => r#"{ "libraryName": "uilib" }"#,
            "src/app.ts" => "import { Button } from \"uilib\";\nButton();\n"
        );

        let logger = VecLogger::new();
        run(
            CliArgs {
                config_path: tmpdir.root_join("on-demand-imports.json").to_string_lossy().to_string(),
                write: true,
                print_schema: false,
                files: vec![tmpdir.root_join("src/app.ts")],
            },
            &logger,
        )
        .unwrap();

        assert_eq!(
            tmpdir.read("src/app.ts").unwrap(),
            "import _Button from \"uilib/lib/button\";\n_Button();\n"
        );
        let logs = logger.get_logs().unwrap();
        assert!(logs
            .iter()
            .any(|log| log.ends_with("injected 1 imports, removed 1 barrel imports")));
    }

    #[test]
    fn test_run_reports_missing_files() {
        let tmpdir = test_tmpdir!(
            "on-demand-imports.json" => r#"{ "libraryName": "uilib" }"#
        );

        let logger = VecLogger::new();
        let result = run(
            CliArgs {
                config_path: tmpdir.root_join("on-demand-imports.json").to_string_lossy().to_string(),
                write: true,
                print_schema: false,
                files: vec![tmpdir.root_join("missing.ts")],
            },
            &logger,
        );
        assert!(result.is_err());
        let logs = logger.get_logs().unwrap();
        assert!(logs
            .iter()
            .any(|log| log.starts_with("ERROR: Failed to read")));
    }
}
