//! veritext CLI - PDF text extraction and AI-authorship detection

use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use veritext::{
    document_info, ChunkedDetector, DetectionClient, DetectorConfig, Error, ErrorClass,
    PdfExtractor, ProgressEvent, ProgressObserver,
};

#[derive(Parser)]
#[command(name = "veritext")]
#[command(version)]
#[command(about = "Extract PDF text and score it for AI authorship", long_about = None)]
struct Cli {
    /// Detection service base URL
    #[arg(long, env = "VERITEXT_BASE_URL", global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract reading-order text from a PDF
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page selection (e.g. "1-10", "1,3,5-7"); all pages if omitted
        #[arg(long)]
        pages: Option<String>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show per-page text previews
    Previews {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Maximum pages to preview
        #[arg(long, default_value = "20")]
        max_pages: usize,
    },

    /// Check whether a PDF looks like a scanned (image-only) document
    ScanCheck {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Score text for AI authorship
    Detect {
        /// Input file: a PDF (extracted first) or plain text; stdin if omitted
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Score the text in word-bounded chunks
        #[arg(long)]
        chunked: bool,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Drives an indicatif bar from extraction/detection progress events.
struct BarObserver {
    bar: ProgressBar,
}

impl BarObserver {
    fn new() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} [{bar:30.cyan/blue}] {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressObserver for BarObserver {
    fn on_progress(&mut self, event: ProgressEvent) {
        if let Some(percent) = event.percent {
            self.bar.set_position(u64::from(percent));
        }
        self.bar.set_message(event.message);
    }
}

/// Parse a page selection string like "1,3,5-7" into a page set.
fn parse_pages(s: &str) -> Result<BTreeSet<u32>, String> {
    let mut pages = BTreeSet::new();
    for part in s.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some((start, end)) = part.split_once('-') {
            let start: u32 = start.trim().parse().map_err(|_| format!("invalid page number in '{part}'"))?;
            let end: u32 = end.trim().parse().map_err(|_| format!("invalid page number in '{part}'"))?;
            if start == 0 || end < start {
                return Err(format!("invalid page range '{part}'"));
            }
            pages.extend(start..=end);
        } else {
            let page: u32 = part.parse().map_err(|_| format!("invalid page number '{part}'"))?;
            if page == 0 {
                return Err("page numbers start at 1".to_string());
            }
            pages.insert(page);
        }
    }
    Ok(pages)
}

fn fail(err: Error) -> ! {
    let hint = match err.class() {
        ErrorClass::Input => "check the input file or text",
        ErrorClass::Transient => "try again in a moment",
        ErrorClass::Service => "the detection service had a problem",
    };
    eprintln!("{} {err} ({hint})", "error:".red().bold());
    std::process::exit(1);
}

fn write_or_print(output: Option<&Path>, content: &str) {
    match output {
        Some(path) => {
            if let Err(err) = std::fs::write(path, content) {
                fail(err.into());
            }
            println!("{} {}", "Saved".green(), path.display());
        }
        None => println!("{content}"),
    }
}

fn cmd_extract(input: &Path, pages: Option<&str>, output: Option<&Path>) {
    let mut observer = BarObserver::new();

    let result = match pages {
        Some(ranges) => {
            let selection = match parse_pages(ranges) {
                Ok(pages) => pages,
                Err(msg) => fail(Error::InvalidSelection(msg)),
            };
            veritext::extract_pages_with_progress(input, &selection, &mut observer)
        }
        None => veritext::extract_text_with_progress(input, &mut observer),
    };
    observer.finish();

    match result {
        Ok(text) => write_or_print(output, &text),
        Err(err) => fail(err),
    }
}

fn cmd_info(input: &Path) {
    let info = document_info(input);

    println!("{}", "Document information".bold());
    if let Some(name) = &info.file_name {
        println!("  File:     {name}");
    }
    if let Some(size) = info.file_size {
        println!("  Size:     {size} bytes");
    }
    println!("  Pages:    {}", info.num_pages);
    if let Some(version) = &info.version {
        println!("  Version:  PDF {version}");
    }
    if let Some(title) = &info.title {
        println!("  Title:    {title}");
    }
    if let Some(author) = &info.author {
        println!("  Author:   {author}");
    }
    if let Some(producer) = &info.producer {
        println!("  Producer: {producer}");
    }
    if info.encrypted {
        println!("  {}", "Encrypted document".yellow());
    }
    if info.num_pages == 0 && !info.encrypted {
        println!("  {}", "Could not parse document".yellow());
    }
}

fn cmd_previews(input: &Path, max_pages: usize) {
    let extractor = match PdfExtractor::open(input) {
        Ok(extractor) => extractor,
        Err(err) => fail(err),
    };

    let previews = extractor.page_previews(max_pages);
    println!(
        "{} ({} of {} pages)",
        "Page previews".bold(),
        previews.previews.len(),
        previews.total_pages
    );

    for preview in &previews.previews {
        let marker = if preview.has_text {
            format!("{} words", preview.word_count).normal()
        } else {
            "no text".yellow()
        };
        println!("\n{} ({marker})", format!("Page {}", preview.page_number).cyan());
        if preview.has_text {
            println!("  {}", preview.text.replace('\n', "\n  "));
        }
    }
}

fn cmd_scan_check(input: &Path) {
    let extractor = match PdfExtractor::open(input) {
        Ok(extractor) => extractor,
        Err(err) => fail(err),
    };

    if extractor.is_likely_scanned() {
        println!(
            "{} This PDF looks scanned; text extraction may be poor.",
            "Warning:".yellow().bold()
        );
    } else {
        println!("{} Document has a usable text layer.", "OK:".green().bold());
    }
}

fn read_detect_input(input: Option<&Path>) -> Result<String, Error> {
    match input {
        Some(path) => {
            let is_pdf = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false);
            if is_pdf {
                let mut observer = BarObserver::new();
                let text = veritext::extract_text_with_progress(path, &mut observer)?;
                observer.finish();
                Ok(text)
            } else {
                Ok(std::fs::read_to_string(path)?)
            }
        }
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn print_result(result: &veritext::DetectionResult) {
    let ai = result.ai_probability;
    let verdict = if ai >= 50 {
        format!("{ai}% AI").red().bold()
    } else {
        format!("{}% human", result.human_probability).green().bold()
    };

    println!("{} {verdict}", "Result:".bold());
    println!("  AI probability:    {}%", result.ai_probability);
    println!("  Human probability: {}%", result.human_probability);
    println!("  Confidence:        {}%", result.confidence_score);
    if let Some(tools) = &result.tool_scores {
        println!("  Per-tool scores:");
        for (tool, score) in tools {
            println!("    {tool}: {score:.0}%");
        }
    }
    println!(
        "  Text: {} words, {} sentences, ~{} min read",
        result.stats.word_count, result.stats.sentence_count, result.stats.reading_time_minutes
    );
}

async fn cmd_detect(input: Option<&Path>, chunked: bool, json: bool, base_url: Option<String>) {
    let text = match read_detect_input(input) {
        Ok(text) => text,
        Err(err) => fail(err),
    };

    let config = match base_url {
        Some(url) => DetectorConfig::new(url),
        None => DetectorConfig::default(),
    };
    let client = match DetectionClient::with_config(config) {
        Ok(client) => client,
        Err(err) => fail(err),
    };

    let mut observer = BarObserver::new();

    if chunked {
        let outcomes = ChunkedDetector::new(&client).detect(&text, &mut observer).await;
        observer.finish();

        if json {
            let rendered: Vec<serde_json::Value> = outcomes
                .iter()
                .map(|outcome| match &outcome.result {
                    Ok(result) => serde_json::json!({
                        "part": outcome.index + 1,
                        "result": result,
                    }),
                    Err(err) => serde_json::json!({
                        "part": outcome.index + 1,
                        "error": err.to_string(),
                    }),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rendered).unwrap());
            return;
        }

        for outcome in &outcomes {
            println!("\n{}", format!("Part {}", outcome.index + 1).bold());
            match &outcome.result {
                Ok(result) => print_result(result),
                Err(err) => println!("  {} {err}", "failed:".red()),
            }
        }
        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        if failed > 0 {
            eprintln!(
                "\n{} {failed} of {} parts failed",
                "Note:".yellow(),
                outcomes.len()
            );
        }
    } else {
        let result = client.detect(&text, &mut observer).await;
        observer.finish();
        match result {
            Ok(result) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&result).unwrap());
                } else {
                    print_result(&result);
                }
            }
            Err(err) => fail(err),
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            input,
            pages,
            output,
        } => cmd_extract(&input, pages.as_deref(), output.as_deref()),
        Commands::Info { input } => cmd_info(&input),
        Commands::Previews { input, max_pages } => cmd_previews(&input, max_pages),
        Commands::ScanCheck { input } => cmd_scan_check(&input),
        Commands::Detect {
            input,
            chunked,
            json,
        } => cmd_detect(input.as_deref(), chunked, json, cli.base_url).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pages_list_and_ranges() {
        let pages = parse_pages("1,3,5-7").unwrap();
        let expected: BTreeSet<u32> = [1, 3, 5, 6, 7].into_iter().collect();
        assert_eq!(pages, expected);
    }

    #[test]
    fn test_parse_pages_rejects_garbage() {
        assert!(parse_pages("abc").is_err());
        assert!(parse_pages("0").is_err());
        assert!(parse_pages("5-2").is_err());
    }

    #[test]
    fn test_parse_pages_deduplicates() {
        let pages = parse_pages("2,2,1-3").unwrap();
        assert_eq!(pages.len(), 3);
    }
}
