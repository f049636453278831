use anyhow::{anyhow, Context, Result};
use std::env;
use std::fs;
use std::process;

use summit_editor::complexity;
use summit_editor::config::EditorConfig;
use summit_editor::material_registry::MaterialRegistry;
use summit_editor::schema::{Level, LevelNode, NodeContent};
use summit_editor::shape_registry::ShapeRegistry;
use summit_editor::source::LevelSource;
use summit_editor::EditorSession;

const CONFIG_PATH: &str = "editor_config.json";

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:?}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args = env::args().skip(1);
    let Some(command) = args.next() else {
        print_usage();
        return Ok(());
    };
    match command.as_str() {
        "inspect" => {
            let path = args
                .next()
                .ok_or_else(|| anyhow!("inspect requires a path: level_tool inspect <level>"))?;
            cmd_inspect(&path)
        }
        "complexity" => {
            let path = args.next().ok_or_else(|| {
                anyhow!("complexity requires a path: level_tool complexity <level>")
            })?;
            cmd_complexity(&path)
        }
        "json" => {
            let path =
                args.next().ok_or_else(|| anyhow!("json requires a path: level_tool json <level>"))?;
            cmd_json(&path)
        }
        "roundtrip" => {
            let input = args.next().ok_or_else(|| {
                anyhow!("roundtrip requires paths: level_tool roundtrip <in> <out>")
            })?;
            let output = args.next().ok_or_else(|| {
                anyhow!("roundtrip requires paths: level_tool roundtrip <in> <out>")
            })?;
            cmd_roundtrip(&input, &output)
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => Err(anyhow!("unknown command '{other}'")),
    }
}

fn print_usage() {
    eprintln!(
        "Level Tool

Usage:
  level_tool inspect <level_path>        Summarize a level file
  level_tool complexity <level_path>     Print the level's complexity score
  level_tool json <level_path>           Dump the decoded document as JSON
  level_tool roundtrip <input> <output>  Decode, materialize, read back, re-encode
  level_tool help                        Show this message
"
    );
}

fn load_level(arg: &str) -> Result<Level> {
    let config = EditorConfig::load_or_default(CONFIG_PATH);
    let bytes = LevelSource::parse(arg)
        .fetch(&config.remote_base_url)
        .with_context(|| format!("fetching level '{arg}'"))?;
    summit_editor::decode(&bytes).with_context(|| format!("decoding level '{arg}'"))
}

fn cmd_inspect(path: &str) -> Result<()> {
    let level = load_level(path)?;
    println!("Title:        {}", display_or_dash(&level.title));
    println!("Creators:     {}", display_or_dash(&level.creators));
    println!("Description:  {}", display_or_dash(&level.description));
    println!("Version:      {}", level.format_version);
    println!("Checkpoints:  {}", level.max_checkpoint_count);
    println!("Ambience:     {}", if level.ambience.is_some() { "yes" } else { "no" });
    let mut counts = NodeCounts::default();
    counts.tally(&level.nodes);
    println!(
        "Nodes:        {} total ({} static, {} crumbling, {} signs, {} groups, {} markers, {} unknown)",
        counts.total,
        counts.statics,
        counts.crumbling,
        counts.signs,
        counts.groups,
        counts.markers,
        counts.unknown
    );
    println!("Complexity:   {}", complexity::of_level(&level));
    Ok(())
}

fn display_or_dash(text: &str) -> &str {
    if text.is_empty() {
        "-"
    } else {
        text
    }
}

#[derive(Default)]
struct NodeCounts {
    total: usize,
    statics: usize,
    crumbling: usize,
    signs: usize,
    groups: usize,
    markers: usize,
    unknown: usize,
}

impl NodeCounts {
    fn tally(&mut self, nodes: &[LevelNode]) {
        for node in nodes {
            self.total += 1;
            match &node.content {
                NodeContent::Static { .. } => self.statics += 1,
                NodeContent::Crumbling { .. } => self.crumbling += 1,
                NodeContent::Sign { .. } => self.signs += 1,
                NodeContent::Group { children, .. } => {
                    self.groups += 1;
                    self.tally(children);
                }
                NodeContent::Start { .. } | NodeContent::Finish { .. } => self.markers += 1,
                NodeContent::Unknown => self.unknown += 1,
            }
        }
    }
}

fn cmd_complexity(path: &str) -> Result<()> {
    let level = load_level(path)?;
    println!("{}", complexity::of_level(&level));
    Ok(())
}

fn cmd_json(path: &str) -> Result<()> {
    let level = load_level(path)?;
    println!("{}", serde_json::to_string_pretty(&level)?);
    Ok(())
}

fn cmd_roundtrip(input_path: &str, output_path: &str) -> Result<()> {
    let level = load_level(input_path)?;
    let session = EditorSession::from_level(&level, ShapeRegistry::standard(), MaterialRegistry::standard())
        .with_context(|| format!("materializing level '{input_path}'"))?;
    let bytes = session.export_level().with_context(|| format!("re-encoding level '{input_path}'"))?;
    fs::write(output_path, &bytes).with_context(|| format!("writing level '{output_path}'"))?;
    println!(
        "Round-tripped '{}' -> '{}' ({} nodes, complexity {})",
        input_path,
        output_path,
        session.tree().len(),
        session.complexity()
    );
    Ok(())
}
