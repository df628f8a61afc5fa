//! mkvmux CLI
//!
//! Thin front end over `mkvmux_core`: identify files, print the mkvmerge
//! command for a mux, or run it.

mod cli;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use mkvmux_core::config::{ConfigManager, Settings};
use mkvmux_core::container::{ContainerFile, TrackSource};
use mkvmux_core::logging::{init_tracing, MessagePrefix};
use mkvmux_core::mux::format_tokens_pretty;
use mkvmux_core::paths::expand_user;
use mkvmux_core::tools::{verify_tool, Probe, Verify};

use cli::{Cli, Commands, MuxArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_deref())?;
    init_tracing(settings.logging.level.more_verbose(cli.verbose));

    match cli.command {
        Commands::Identify { file } => identify(&settings, &file)?,
        Commands::Command(args) => print_command(&settings, &args)?,
        Commands::Mux { args, silent } => mux(&settings, &args, silent)?,
        Commands::Tools => report_tools(&settings),
    }

    Ok(())
}

fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "mkvmux").map(|dirs| dirs.config_dir().join("mkvmux.toml"))
}

/// An explicit config file must exist; the default one is optional.
fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    let (path, required) = match explicit {
        Some(path) => (expand_user(path), true),
        None => match default_config_path() {
            Some(path) => (path, false),
            None => return Ok(Settings::default()),
        },
    };

    if !required && !path.exists() {
        return Ok(Settings::default());
    }

    tracing::debug!("Loading config {}", path.display());
    let mut manager = ConfigManager::new(&path);
    manager
        .load()
        .with_context(|| format!("Failed to load config {}", path.display()))?;
    Ok(manager.settings().clone())
}

fn identify(settings: &Settings, file: &Path) -> Result<()> {
    let mkvmerge = settings.tools.mkvmerge();
    let info = mkvmerge
        .identify(&expand_user(file))
        .with_context(|| format!("Failed to identify {}", file.display()))?;

    println!("File: {}", info.file_path.display());
    println!(
        "Container: {} (recognized: {}, supported: {})",
        info.container_type, info.recognized, info.supported
    );
    if let Some(title) = &info.title {
        println!("Title: {}", title);
    }
    if let Some(duration) = info.duration_secs() {
        println!("Duration: {:.3}s", duration);
    }

    for track in &info.tracks {
        let mut line = format!("  Track {}: {} ({})", track.id, track.track_type, track.codec);
        if let Some(language) = track.language_ietf.as_deref().or(track.language.as_deref()) {
            line.push_str(&format!(" [{}]", language));
        }
        if let Some(name) = &track.name {
            line.push_str(&format!(" \"{}\"", name));
        }
        if track.is_default == Some(true) {
            line.push_str(" default");
        }
        if track.is_forced == Some(true) {
            line.push_str(" forced");
        }
        println!("{}", line);
    }
    for attachment in &info.attachments {
        println!(
            "  Attachment {}: {} ({} bytes)",
            attachment.id, attachment.file_name, attachment.size
        );
    }
    if info.chapter_count > 0 {
        println!("  Chapters: {} edition(s)", info.chapter_count);
    }

    Ok(())
}

fn build_container(settings: &Settings, args: &MuxArgs) -> Result<ContainerFile> {
    let mut file = ContainerFile::with_tools(Arc::new(settings.tools.mkvmerge()));
    file.title = args.title.clone();

    for input in &args.inputs {
        let added = match input.track_id {
            Some(id) => file.add_track(TrackSource::path(&input.path, id)),
            None => file.add_file(input.path.as_path()),
        };
        added.with_context(|| format!("Cannot add input {}", input))?;
    }

    for attachment in &args.attachments {
        file.add_attachment(attachment.as_path())
            .with_context(|| format!("Cannot attach {}", attachment.display()))?;
    }

    match &args.chapters {
        Some(chapters) => file
            .chapters(chapters, args.chapter_language.as_deref())
            .with_context(|| format!("Cannot use chapters {}", chapters.display()))?,
        None => file.set_chapter_language(args.chapter_language.as_deref())?,
    }

    if let Some(tags) = &args.global_tags {
        file.global_tags(tags)
            .with_context(|| format!("Cannot use global tags {}", tags.display()))?;
    }

    let link = args.link || settings.mux.link_splits;
    if let Some(bytes) = args.split_size {
        file.split_size(bytes, link)?;
    } else if let Some(duration) = args.split_duration {
        file.split_duration(duration, link)?;
    } else if let Some(chapters) = &args.split_chapters {
        file.split_chapters(chapters.0.clone(), link)?;
    }

    Ok(file)
}

fn print_command(settings: &Settings, args: &MuxArgs) -> Result<()> {
    let file = build_container(settings, args)?;
    if settings.logging.pretty_command {
        print!("{}", format_tokens_pretty(&file.command(&args.output)));
    } else {
        println!("{}", file.command_line(&args.output));
    }
    Ok(())
}

fn mux(settings: &Settings, args: &MuxArgs, silent: bool) -> Result<()> {
    let file = build_container(settings, args)?;
    file.mux(&args.output, silent || settings.mux.silent)
        .with_context(|| format!("Failed to mux {}", args.output.display()))?;
    println!(
        "{}",
        MessagePrefix::Success.format(&format!("Wrote {}", args.output.display()))
    );
    Ok(())
}

fn report_tools(settings: &Settings) {
    let mkvmerge = settings.tools.mkvmerge();
    let status = |ok: bool| if ok { "ok" } else { "not available" };

    println!(
        "mkvmerge ({}): {}",
        mkvmerge.path().display(),
        status(mkvmerge.is_tool_available())
    );

    let mkvextract = expand_user(&settings.tools.mkvextract_path);
    println!(
        "mkvextract ({}): {}",
        mkvextract.display(),
        status(verify_tool(&mkvextract, "mkvextract"))
    );
}
