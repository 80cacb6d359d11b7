// FILE: src/cli/handlers.rs
use crate::{
    compile_file_with_options, compile_source_with_options, parse_source, style_map_to_css,
    CompilationStats, CompilerError, CompilerOptions, OutputFormat, Parser, Result,
};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Instant;

/// Extensions `check -r` picks up
const TEMPLATE_EXTENSIONS: &[&str] = &["json", "css"];

// --- COMPILE ---
pub fn handle_compile_command(cli: &super::EnhancedCli, matches: &clap::ArgMatches) -> Result<()> {
    let input_path = required_arg(matches, "input")?;
    let options = cli.build_compiler_options(matches)?;

    let output_path = match matches.get_one::<String>("output") {
        Some(path) => path.clone(),
        None => default_output_path(input_path, cli.output_directory(), options.output_format),
    };

    if matches.get_flag("watch") {
        watch_and_compile(input_path, &output_path, options)
    } else {
        compile_single_file(input_path, &output_path, options, matches.get_flag("stats"))
    }
}

fn default_output_path(input_path: &str, output_directory: Option<&str>, format: OutputFormat) -> String {
    let extension = match format {
        OutputFormat::Js => "js",
        OutputFormat::Json => "compiled.json",
        OutputFormat::Debug => "debug.txt",
    };
    let file = Path::new(input_path).with_extension(extension);

    let path = match (output_directory, file.file_name()) {
        (Some(dir), Some(name)) => PathBuf::from(dir).join(name),
        _ => file,
    };
    path.to_string_lossy().into_owned()
}

fn compile_single_file(
    input_path: &str,
    output_path: &str,
    options: CompilerOptions,
    show_stats: bool,
) -> Result<()> {
    println!("🔨 Compiling {} -> {}", input_path, output_path);

    let compile_start = Instant::now();
    let stats = compile_file_with_options(input_path, output_path, options)?;
    let compile_time = compile_start.elapsed();

    println!("✅ Compilation successful!");
    println!(
        "   Templates: {} transformed, {} left unchanged",
        stats.transformed_count, stats.passthrough_count
    );
    println!("   Output: {} bytes", stats.output_size);
    println!("   Time: {}ms", compile_time.as_millis());

    if stats.passthrough_count > 0 {
        println!("   ⚠️  Unchanged templates fall back to runtime parsing");
    }

    if show_stats {
        print_detailed_stats(&stats);
    }

    Ok(())
}

fn watch_and_compile(input_path: &str, output_path: &str, options: CompilerOptions) -> Result<()> {
    println!("👀 Watching {} for changes...", input_path);

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if let Ok(event) = res {
                if let Err(e) = tx.send(event) {
                    eprintln!("Watch error: {}", e);
                }
            }
        },
        notify::Config::default(),
    )
    .map_err(|e| {
        CompilerError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Failed to create file watcher: {}", e),
        ))
    })?;

    watcher
        .watch(Path::new(input_path), RecursiveMode::NonRecursive)
        .map_err(|e| {
            CompilerError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to watch file: {}", e),
            ))
        })?;

    if let Err(e) = compile_file_with_options(input_path, output_path, options.clone()) {
        eprintln!("❌ Initial compilation failed: {}", e);
    } else {
        println!("✅ Initial compilation successful");
    }

    loop {
        match rx.recv() {
            Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                println!("🔄 File changed, recompiling...");
                match compile_file_with_options(input_path, output_path, options.clone()) {
                    Ok(stats) => {
                        println!(
                            "✅ Recompiled successfully ({} templates, {} bytes, {}ms)",
                            stats.template_count, stats.output_size, stats.compile_time_ms
                        );
                    }
                    Err(e) => eprintln!("❌ Compilation failed: {}", e),
                }
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Watch error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

fn print_detailed_stats(stats: &CompilationStats) {
    println!("\n📊 Detailed Compilation Statistics:");
    println!("   Source size: {} bytes", stats.source_size);
    println!("   Output size: {} bytes", stats.output_size);
    println!("   Compile time: {}ms", stats.compile_time_ms);
    println!("\n   Template breakdown:");
    println!("     Templates: {}", stats.template_count);
    println!("     Transformed: {}", stats.transformed_count);
    println!("     Passed through: {}", stats.passthrough_count);
    println!("     Stylesheets: {}", stats.style_sheet_count);
    println!("     Static properties: {}", stats.static_property_count);
    println!("     Dynamic properties: {}", stats.dynamic_property_count);
    if stats.skipped_declarations > 0 {
        println!("     Skipped declarations: {}", stats.skipped_declarations);
    }
}

// --- CHECK ---
pub fn handle_check_command(matches: &clap::ArgMatches) -> Result<()> {
    let input_path = required_arg(matches, "input")?;
    let recursive = matches.get_flag("recursive");

    if recursive && Path::new(input_path).is_dir() {
        check_directory_recursive(input_path)
    } else {
        check_single_file(input_path).map(|_| ())
    }
}

/// Returns the number of findings; unreadable input is an error.
fn check_single_file(input_path: &str) -> Result<usize> {
    println!("🔍 Checking {}", input_path);

    let text = fs::read_to_string(input_path).map_err(|e| CompilerError::FileNotFound {
        path: format!("{}: {}", input_path, e),
    })?;
    let source = parse_source(&text, input_path)?;
    let (module, _) = compile_source_with_options(&source, input_path, &CompilerOptions::default());

    let mut findings = 0;
    for (index, template) in module.templates.iter().enumerate() {
        let label = template.name.clone().unwrap_or_else(|| format!("template {}", index));
        let diagnostics = &template.diagnostics;

        for declaration in &diagnostics.skipped {
            println!("   ⚠️  {}: skipped malformed declaration '{}'", label, declaration);
        }
        for property in &diagnostics.unknown_properties {
            println!("   ⚠️  {}: '{}' is not a known style property", label, property);
        }
        for shorthand in &diagnostics.ambiguous_shorthands {
            println!("   ⚠️  {}: '{}' kept as a single value", label, shorthand);
        }
        for property in &diagnostics.relocated {
            println!("   ℹ️  {}: '{}' moved to dynamic styles", label, property);
        }
        if !template.transformed {
            println!("   ⚠️  {}: left unchanged", label);
            findings += 1;
        }
        findings += diagnostics.skipped.len()
            + diagnostics.unknown_properties.len()
            + diagnostics.ambiguous_shorthands.len();

        if let Some(registration) = &template.instructions.style_sheet_registration {
            log::debug!("{} static styles:\n{}", label, style_map_to_css(&registration.properties));
        }
    }

    if findings == 0 {
        println!("✅ {} - No issues found", input_path);
    } else {
        println!("❌ {} - {} issue(s)", input_path, findings);
    }
    Ok(findings)
}

fn check_directory_recursive(dir_path: &str) -> Result<()> {
    let mut total_files = 0;
    let mut error_files = 0;

    for entry in walkdir::WalkDir::new(dir_path) {
        let entry = entry.map_err(|e| {
            CompilerError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Directory traversal error: {}", e),
            ))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_template = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| TEMPLATE_EXTENSIONS.contains(&ext));
        if !is_template {
            continue;
        }

        total_files += 1;
        let path = entry.path().to_string_lossy();
        match check_single_file(&path) {
            Ok(0) => {}
            Ok(_) => error_files += 1,
            Err(e) => {
                println!("❌ {} - {}", path, e);
                error_files += 1;
            }
        }
    }

    println!("\n📊 Check Summary:");
    println!("   Total files: {}", total_files);
    println!("   Files with issues: {}", error_files);
    if total_files > 0 {
        println!(
            "   Clean rate: {:.1}%",
            (total_files - error_files) as f64 / total_files as f64 * 100.0
        );
    }

    if error_files > 0 {
        Err(CompilerError::invalid_format(format!("{} files have issues", error_files)))
    } else {
        Ok(())
    }
}

// --- PARSE ---
pub fn handle_parse_command(matches: &clap::ArgMatches) -> Result<()> {
    let block = required_arg(matches, "block")?;

    let mut parser = Parser::new();
    let rule = parser.parse(block);
    let json = serde_json::to_string_pretty(&rule)
        .map_err(|e| CompilerError::codegen(format!("JSON serialization error: {}", e)))?;
    println!("{}", json);

    if !parser.diagnostics().is_clean() {
        eprintln!("{:#?}", parser.diagnostics());
    }
    Ok(())
}

fn required_arg<'a>(matches: &'a clap::ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| CompilerError::invalid_format(format!("missing argument <{}>", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_output_path() {
        assert_eq!(default_output_path("src/card.css", None, OutputFormat::Js), "src/card.js");
        assert_eq!(
            default_output_path("src/card.json", Some("out"), OutputFormat::Json),
            PathBuf::from("out").join("card.compiled.json").to_string_lossy()
        );
    }

    #[test]
    fn test_check_counts_findings() {
        let temp_dir = TempDir::new().unwrap();
        let clean = temp_dir.path().join("clean.css");
        let noisy = temp_dir.path().join("noisy.css");
        fs::write(&clean, "padding: 4px 8px; color: red;").unwrap();
        fs::write(&noisy, "colour: red; nonsense; opacity: 1").unwrap();

        assert_eq!(check_single_file(clean.to_str().unwrap()).unwrap(), 0);
        assert_eq!(check_single_file(noisy.to_str().unwrap()).unwrap(), 2);
        assert!(check_directory_recursive(temp_dir.path().to_str().unwrap()).is_err());

        fs::remove_file(&noisy).unwrap();
        assert!(check_directory_recursive(temp_dir.path().to_str().unwrap()).is_ok());
    }
}
