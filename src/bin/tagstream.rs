//! Command-line interface for tagstream
//! This binary is used to inspect how a piece of text splits into segments
//! for a given tag registry, either in one pass or replayed as a chunked
//! stream.
//!
//! Usage:
//!   tagstream parse `<path>` --tags callout,note [--self-closing image,hr]
//!   tagstream stream `<path>` --tags callout --chunk-size 8

use clap::{Arg, Command};
use std::process::exit;
use tagstream::{TagDefinition, TagParser, TagRegistry};

fn main() {
    let matches = Command::new("tagstream")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect how text splits into tag and text segments")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("parse")
                .about("Parse a whole file and print its segments as JSON")
                .arg(
                    Arg::new("path")
                        .help("Path to the text file to parse")
                        .required(true)
                        .index(1),
                )
                .arg(tags_arg())
                .arg(self_closing_arg()),
        )
        .subcommand(
            Command::new("stream")
                .about("Replay a file in fixed-size chunks and show per-chunk output")
                .arg(
                    Arg::new("path")
                        .help("Path to the text file to replay")
                        .required(true)
                        .index(1),
                )
                .arg(tags_arg())
                .arg(self_closing_arg())
                .arg(
                    Arg::new("chunk-size")
                        .long("chunk-size")
                        .short('c')
                        .help("Chunk size in bytes (split is adjusted to char boundaries)")
                        .default_value("16"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("parse", parse_matches)) => {
            let path = parse_matches.get_one::<String>("path").unwrap();
            let parser = build_parser(parse_matches);
            handle_parse_command(path, &parser);
        }
        Some(("stream", stream_matches)) => {
            let path = stream_matches.get_one::<String>("path").unwrap();
            let chunk_size: usize = stream_matches
                .get_one::<String>("chunk-size")
                .unwrap()
                .parse()
                .unwrap_or_else(|_| {
                    eprintln!("Error: --chunk-size must be a positive integer");
                    exit(1);
                });
            let parser = build_parser(stream_matches);
            handle_stream_command(path, &parser, chunk_size.max(1));
        }
        _ => unreachable!(),
    }
}

fn tags_arg() -> Arg {
    Arg::new("tags")
        .long("tags")
        .short('t')
        .help("Comma-separated content-bearing tag names to recognize")
        .default_value("")
}

fn self_closing_arg() -> Arg {
    Arg::new("self-closing")
        .long("self-closing")
        .help("Comma-separated self-closing tag names to recognize")
        .default_value("")
}

/// Build a parser from the --tags / --self-closing flags. The CLI registry
/// carries no attribute schemas, so attributes come through as raw strings.
fn build_parser(matches: &clap::ArgMatches) -> TagParser {
    let mut definitions = Vec::new();
    for name in split_names(matches.get_one::<String>("tags").unwrap()) {
        definitions.push(TagDefinition::new(name));
    }
    for name in split_names(matches.get_one::<String>("self-closing").unwrap()) {
        definitions.push(TagDefinition::self_closing(name));
    }
    TagParser::new(TagRegistry::new(definitions))
}

fn split_names(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|name| !name.is_empty())
}

/// Handle the parse command
fn handle_parse_command(path: &str, parser: &TagParser) {
    let input = read_input(path);
    let segments = parser.parse(&input);
    match serde_json::to_string_pretty(&segments) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing segments: {}", e);
            exit(1);
        }
    }
}

/// Handle the stream command
fn handle_stream_command(path: &str, parser: &TagParser, chunk_size: usize) {
    let input = read_input(path);
    let mut state = parser.initial_state();

    for (index, chunk) in char_chunks(&input, chunk_size).into_iter().enumerate() {
        let outcome = parser.parse_chunk(chunk, state);
        state = outcome.state;

        println!("-- chunk {} ({:?})", index, chunk);
        for segment in &outcome.segments {
            println!("   segment: {}", serde_json::to_string(segment).unwrap_or_default());
        }
        if outcome.is_buffering {
            match &outcome.buffering_tag {
                Some(tag) => println!("   buffering: <{}>", tag),
                None => println!("   buffering: text tail"),
            }
        }
        if let Some(partial) = &outcome.partial {
            println!(
                "   partial: {}",
                serde_json::to_string(partial).unwrap_or_default()
            );
        }
    }

    for segment in parser.finalize(state) {
        println!("-- finalize");
        println!("   segment: {}", serde_json::to_string(&segment).unwrap_or_default());
    }
}

fn read_input(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading {}: {}", path, e);
            exit(1);
        }
    }
}

/// Split `input` into chunks of roughly `size` bytes, nudging each split
/// forward to the next char boundary.
fn char_chunks(input: &str, size: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < input.len() {
        let mut end = (start + size).min(input.len());
        while !input.is_char_boundary(end) {
            end += 1;
        }
        chunks.push(&input[start..end]);
        start = end;
    }
    chunks
}
