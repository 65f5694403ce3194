use anyhow::{Context, Result};
use bugwave_core::{Comment, CommentId, IgnoreReason, Outcome, PixelPosition, Role};
use bugwave_storage::{CommentRepository, CommentStorage};
use bugwave_ui::{AnnotationOverlay, DocumentRef, OverlayConfig, OverlayFrame, Primitive};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "bugwave")]
#[command(about = "BugWave review comments")]
pub struct Cli {
    /// Directory holding saved comments.
    #[arg(long, global = true, env = "BUGWAVE_DATA_DIR", value_name = "DIR")]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the comments of a document.
    List {
        #[arg(long)]
        document: String,
        /// Only comments by this author.
        #[arg(long)]
        author: Option<String>,
        /// Only comments whose text contains this query.
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Place a new comment.
    Add {
        #[arg(long)]
        document: String,
        /// Participant role, e.g. avaliador or aluno.
        #[arg(long)]
        role: String,
        #[arg(long, allow_negative_numbers = true)]
        x: f32,
        #[arg(long, allow_negative_numbers = true)]
        y: f32,
        #[arg(long)]
        text: String,
        #[arg(long)]
        author: Option<String>,
    },
    /// Rewrite the text of a comment.
    Edit {
        #[arg(long)]
        document: String,
        #[arg(long)]
        role: String,
        #[arg(long)]
        id: CommentId,
        #[arg(long)]
        text: String,
    },
    /// Delete a comment.
    Delete {
        #[arg(long)]
        document: String,
        #[arg(long)]
        role: String,
        #[arg(long)]
        id: CommentId,
    },
    /// Print the overlay frame, or its paint primitives, as JSON.
    Render {
        #[arg(long)]
        document: String,
        #[arg(long)]
        role: String,
        /// Comment whose marker is hovered.
        #[arg(long)]
        hover: Option<CommentId>,
        /// Comment whose card is clicked open.
        #[arg(long)]
        active: Option<CommentId>,
        /// Emit paint primitives in paint order instead of the layout.
        #[arg(long)]
        scene: bool,
    },
    /// Print CLI version.
    Version,
}

#[derive(Debug, Serialize)]
struct RenderOutput<'a> {
    document: &'a DocumentRef,
    role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    frame: Option<OverlayFrame>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scene: Option<Vec<&'a Primitive>>,
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    match cli.command {
        Commands::List { document, author, search, json } => {
            let storage = open_storage(cli.data_dir)?;
            run_list(storage, &document, author.as_deref(), search.as_deref(), json)
        }
        Commands::Add { document, role, x, y, text, author } => {
            let storage = open_storage(cli.data_dir)?;
            run_add(&storage, &document, &role, PixelPosition::new(x, y), text, author)
        }
        Commands::Edit { document, role, id, text } => {
            let storage = open_storage(cli.data_dir)?;
            run_edit(&storage, &document, &role, id, text)
        }
        Commands::Delete { document, role, id } => {
            let storage = open_storage(cli.data_dir)?;
            run_delete(&storage, &document, &role, id)
        }
        Commands::Render { document, role, hover, active, scene } => {
            let storage = open_storage(cli.data_dir)?;
            run_render(&storage, &document, &role, hover, active, scene)
        }
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn open_storage(data_dir: Option<PathBuf>) -> Result<CommentStorage> {
    match data_dir {
        Some(root) => Ok(CommentStorage::with_root(root)),
        None => CommentStorage::from_default_project().context("failed to locate data directory"),
    }
}

fn open_overlay(
    storage: &CommentStorage,
    document: &str,
    role: &str,
) -> Result<AnnotationOverlay> {
    let comments = storage
        .load_comments(document)
        .with_context(|| format!("failed to load comments for {document}"))?;

    Ok(AnnotationOverlay::new(DocumentRef::new(document, ""), Role::from_tag(role), comments)
        .with_config(OverlayConfig::from_env()))
}

fn save(storage: &CommentStorage, overlay: &AnnotationOverlay) -> Result<()> {
    let document = &overlay.document().id;
    storage
        .save_comments(document, overlay.comments())
        .with_context(|| format!("failed to save comments for {document}"))
}

fn applied<T>(operation: &str, outcome: Outcome<T>) -> Result<T> {
    match outcome {
        Outcome::Applied(value) => Ok(value),
        Outcome::Ignored(reason) => Err(ignored(operation, reason)),
    }
}

fn ignored(operation: &str, reason: IgnoreReason) -> anyhow::Error {
    anyhow::anyhow!("{operation} ignored: {}", reason.describe())
}

fn run_list(
    storage: CommentStorage,
    document: &str,
    author: Option<&str>,
    search: Option<&str>,
    json: bool,
) -> Result<()> {
    let repository = CommentRepository::new(storage, document);

    let mut comments = match author {
        Some(author) => repository.by_author(author)?,
        None => repository.all()?,
    };
    if let Some(query) = search {
        let hits: HashSet<CommentId> =
            repository.search_text(query)?.iter().map(Comment::id).collect();
        comments.retain(|comment| hits.contains(&comment.id()));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&comments)?);
        return Ok(());
    }

    if comments.is_empty() {
        println!("no comments");
        return Ok(());
    }
    for comment in &comments {
        let position = comment.position();
        println!(
            "{}  ({:.1}, {:.1})  {}  {}",
            comment.id(),
            position.x,
            position.y,
            comment.author().unwrap_or("-"),
            comment.formatted_timestamp().unwrap_or_else(|| "-".to_string()),
        );
        for line in comment.text().lines() {
            println!("    {line}");
        }
    }

    Ok(())
}

fn run_add(
    storage: &CommentStorage,
    document: &str,
    role: &str,
    position: PixelPosition,
    text: String,
    author: Option<String>,
) -> Result<()> {
    let mut overlay = open_overlay(storage, document, role)?;
    if let Some(author) = author {
        overlay = overlay.with_author(author);
    }

    applied("add", overlay.begin_placement())?;
    applied("add", overlay.capture_click(position))?;
    applied("add", overlay.set_draft_text(text))?;
    let id = applied("add", overlay.commit())?;

    save(storage, &overlay)?;
    println!("{id}");
    Ok(())
}

fn run_edit(
    storage: &CommentStorage,
    document: &str,
    role: &str,
    id: CommentId,
    text: String,
) -> Result<()> {
    let mut overlay = open_overlay(storage, document, role)?;

    applied("edit", overlay.begin_edit(id))?;
    applied("edit", overlay.set_draft_text(text))?;
    applied("edit", overlay.save_edit())?;

    save(storage, &overlay)
}

fn run_delete(
    storage: &CommentStorage,
    document: &str,
    role: &str,
    id: CommentId,
) -> Result<()> {
    let mut overlay = open_overlay(storage, document, role)?;

    applied("delete", overlay.delete(id))?;

    save(storage, &overlay)
}

fn run_render(
    storage: &CommentStorage,
    document: &str,
    role: &str,
    hover: Option<CommentId>,
    active: Option<CommentId>,
    scene: bool,
) -> Result<()> {
    let mut overlay = open_overlay(storage, document, role)?;

    for id in hover.iter().chain(active.iter()) {
        if !overlay.store().contains(*id) {
            return Err(ignored("render", IgnoreReason::UnknownComment));
        }
    }
    overlay.hover(hover);
    if let Some(id) = active {
        overlay.activate(id);
    }

    let graph = scene.then(|| overlay.scene());
    let output = RenderOutput {
        document: overlay.document(),
        role: overlay.role(),
        frame: (!scene).then(|| overlay.frame()),
        scene: graph.as_ref().map(|graph| graph.collect_render_commands()),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
