mod cli;

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use cli::{CheckArgs, Cli, Command, MoveArgs, RenameArgs, TreeArgs};
use treemv::core::expanded::ExpandedDirs;
use treemv::core::render::write_tree;
use treemv::core::tree::{self, check_snapshot};
use treemv::models::EntryKind;
use treemv::store::{LocalStore, RemoteStore};
use treemv::{NameCheck, RenamePlan, TreeOptions, TreeState};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("treemv: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Error);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Tree(args) => print_tree(args).await,
        Command::Check(args) => check(args).await,
        Command::Mv(args) => rename(args).await,
        Command::Move(args) => move_into(args).await,
    }
}

async fn load(root: &Path) -> anyhow::Result<(LocalStore, TreeState)> {
    let metadata = std::fs::metadata(root).with_context(|| root.display().to_string())?;
    if !metadata.is_dir() {
        anyhow::bail!("{}: not a directory", root.display());
    }

    let store = LocalStore::new(root);
    let entries = store
        .list_entries()
        .await
        .with_context(|| format!("listing {}", root.display()))?;
    check_snapshot(&entries).with_context(|| format!("listing {}", root.display()))?;
    log::debug!("{} entries under {}", entries.len(), root.display());

    let state = TreeState::new(root.display().to_string(), entries);
    Ok((store, state))
}

async fn print_tree(args: TreeArgs) -> anyhow::Result<()> {
    let is_current_dir = args.root.is_none();
    let root = args.root.unwrap_or_else(|| ".".into());
    let (_store, state) = load(&root).await?;

    let options = TreeOptions {
        ignore_pattern: args.ignore,
        show_hidden: !args.hide_hidden,
        dirs_first: args.dirs_first,
    };
    let nodes = tree::build_tree(state.entries(), &options)?;

    let mut stdout = std::io::stdout().lock();
    if args.json {
        let everything: ExpandedDirs = tree::with_directories(state.entries())
            .into_iter()
            .filter(|entry| entry.kind == EntryKind::Directory)
            .map(|entry| entry.path)
            .collect();
        let rows = tree::visible_rows(&nodes, &everything);
        serde_json::to_writer_pretty(&mut stdout, &rows)?;
        writeln!(stdout)?;
    } else {
        writeln!(stdout, "{}", root_display_name(&root, is_current_dir))?;
        write_tree(&mut stdout, &nodes)?;
    }
    Ok(())
}

async fn check(args: CheckArgs) -> anyhow::Result<()> {
    let (_store, state) = load(&args.root).await?;
    if !treemv::core::validate::path_in_use(state.entries(), &args.path) {
        anyhow::bail!("no such path: {}", args.path);
    }
    match treemv::validate_new_name(&args.new_name, &args.path, state.entries())? {
        NameCheck::Unchanged => println!("unchanged: {}", args.path),
        NameCheck::Changed { new_path } => println!("ok: {} -> {new_path}", args.path),
    }
    Ok(())
}

async fn rename(args: RenameArgs) -> anyhow::Result<()> {
    let (store, mut state) = load(&args.root).await?;
    let plan = treemv::plan_rename(&state, &args.path, &args.new_name)?;
    carry_out(&store, &mut state, plan, args.dry_run).await
}

async fn move_into(args: MoveArgs) -> anyhow::Result<()> {
    let (store, mut state) = load(&args.root).await?;
    let target = match args.target_dir.trim_matches('/') {
        "." => "",
        target => target,
    };
    let plan = treemv::plan_move(&state, &args.path, target)?;
    carry_out(&store, &mut state, plan, args.dry_run).await
}

async fn carry_out(
    store: &LocalStore,
    state: &mut TreeState,
    plan: Option<RenamePlan>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let Some(plan) = plan else {
        println!("unchanged");
        return Ok(());
    };

    if dry_run {
        for file in &plan.moves {
            println!("{} -> {}", file.from, file.to);
        }
        return Ok(());
    }

    let report = treemv::apply_plan(store, &plan).await?;
    state.commit(&plan)?;
    println!(
        "renamed {} -> {} ({} files)",
        plan.old_path,
        plan.new_path,
        report.steps.len() / 2
    );
    Ok(())
}

fn root_display_name(root: &Path, is_current_dir: bool) -> String {
    if is_current_dir {
        return ".".to_owned();
    }

    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.as_os_str().to_string_lossy().into_owned())
}
