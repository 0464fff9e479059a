use anyhow::{Context, Result};
use chrono::Utc;
use pipeline_activity::cli::commands::{
    ActivityArgs, BreakpointCommand, ListCommand, LogsCommand, OpenCommand, ResourceArgs, ShellCommand,
};
use pipeline_activity::cli::output::*;
use pipeline_activity::cli::{Cli, Command};
use pipeline_activity::core::config::{load_resources, Settings};
use pipeline_activity::core::summary::{matches_search, sort_activities, ActivityRow};
use pipeline_activity::core::{Activity, Pod};
use pipeline_activity::host::{DryRunHost, EffectExecutor, SubprocessHost};
use pipeline_activity::persistence::{BreakpointStore, FileBreakpointStore, InMemoryPodStore};
use pipeline_activity::resolve::{breakpoint_for_activity, ActivityActions, ActivityMenu, Effect};
use tracing::level_filters::LevelFilter;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging, RUST_LOG overrides the default level
    let level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;

    match &cli.command {
        Command::List(cmd) => list_activities(cmd, cli.json)?,
        Command::Show(cmd) => show_activity(&cmd.activity, &settings, cli.json)?,
        Command::Logs(LogsCommand { activity: args, .. })
        | Command::Shell(ShellCommand { activity: args, .. })
        | Command::Open(OpenCommand { activity: args, .. }) => {
            let workspace = Workspace::load(&args.resources)?;
            let activity = workspace.activity(&args.name)?;
            let breakpoints = open_breakpoints(&settings);
            let actions = workspace.actions(activity, &settings);
            let effect = activity_effect(&cli.command, activity, &actions, &breakpoints)?;
            run_effect(&cli, &settings, breakpoints, effect).await?;
        }
        Command::Breakpoint(cmd) => manage_breakpoint(&cli, cmd, &settings).await?,
    }

    Ok(())
}

/// The effect a logs, shell or open command asks for
fn activity_effect(
    command: &Command,
    activity: &Activity,
    actions: &ActivityActions<'_>,
    breakpoints: &dyn BreakpointStore,
) -> Result<Option<Effect>> {
    let menu = ActivityMenu::build(activity, breakpoints);
    let effect = match command {
        Command::Logs(cmd) => {
            let container = cmd
                .container
                .clone()
                .or(menu.latest_step)
                .with_context(|| format!("Activity {} has no steps", activity.name()))?;
            actions.view_logs(&container)
        }
        Command::Shell(cmd) => {
            let container = cmd.container.clone().or(menu.running_step);
            actions.exec_shell(container.as_deref())
        }
        Command::Open(OpenCommand { link: Some(index), .. }) => {
            let link = menu
                .links
                .get(*index)
                .with_context(|| format!("Activity {} has no link {}", activity.name(), index))?;
            actions.open_link(&link.url)
        }
        Command::Open(OpenCommand { link: None, .. }) => actions.open_repository(),
        _ => None,
    };
    Ok(effect)
}

/// Activities and pods loaded from exported resource files
struct Workspace {
    activities: Vec<Activity>,
    pods: InMemoryPodStore,
}

impl Workspace {
    fn load(resources: &ResourceArgs) -> Result<Self> {
        let activities: Vec<Activity> = load_resources(&resources.activities)
            .context("Failed to load activities")?;
        let pods: Vec<Pod> = match &resources.pods {
            Some(path) => load_resources(path).context("Failed to load pods")?,
            None => Vec::new(),
        };
        debug!("Loaded {} activities and {} pods", activities.len(), pods.len());
        Ok(Self {
            activities,
            pods: InMemoryPodStore::new(pods),
        })
    }

    fn activity(&self, name: &str) -> Result<&Activity> {
        self.activities
            .iter()
            .find(|a| a.name() == name)
            .with_context(|| format!("Activity {} not found", name))
    }

    fn actions<'a>(&'a self, activity: &'a Activity, settings: &'a Settings) -> ActivityActions<'a> {
        ActivityActions::new(activity, &self.pods, settings)
    }
}

/// Open the breakpoint store; an unreadable store stays unloaded
fn open_breakpoints(settings: &Settings) -> FileBreakpointStore {
    let mut store = FileBreakpointStore::new(settings.breakpoint_store_path());
    if let Err(e) = store.load() {
        warn!("Breakpoints unavailable: {}", e);
    }
    store
}

fn list_activities(cmd: &ListCommand, json: bool) -> Result<()> {
    let mut activities: Vec<Activity> = load_resources(&cmd.resources.activities)
        .context("Failed to load activities")?;

    if let Some(query) = &cmd.search {
        activities.retain(|a| matches_search(a, query));
    }
    if let Some(sort) = cmd.sort {
        sort_activities(&mut activities, sort.into());
    }

    let rows: Vec<ActivityRow> = activities.iter().map(ActivityRow::from_activity).collect();
    if json {
        let data = serde_json::json!({ "activities": rows });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("{} No activities found", INFO);
        return Ok(());
    }
    println!("{}", format_activity_table(&rows, terminal_width(), Utc::now()));
    Ok(())
}

fn show_activity(args: &ActivityArgs, settings: &Settings, json: bool) -> Result<()> {
    let workspace = Workspace::load(&args.resources)?;
    let activity = workspace.activity(&args.name)?;
    let menu = ActivityMenu::build(activity, &open_breakpoints(settings));

    if json {
        println!("{}", serde_json::to_string_pretty(&menu)?);
    } else {
        println!("{}", format_menu(activity.name(), &menu));
    }
    Ok(())
}

async fn manage_breakpoint(cli: &Cli, cmd: &BreakpointCommand, settings: &Settings) -> Result<()> {
    let args = match cmd {
        BreakpointCommand::Status(args) | BreakpointCommand::Add(args) | BreakpointCommand::Remove(args) => args,
    };
    let workspace = Workspace::load(&args.resources)?;
    let activity = workspace.activity(&args.name)?;
    let store = open_breakpoints(settings);
    if !store.is_loaded() {
        anyhow::bail!(
            "Breakpoint store {} could not be loaded",
            store.path().display()
        );
    }
    let existing = breakpoint_for_activity(&store, activity);
    let actions = workspace.actions(activity, settings);

    let effect = match cmd {
        BreakpointCommand::Status(_) => {
            match &existing {
                Some(bp) if cli.json => println!("{}", serde_json::to_string_pretty(bp)?),
                Some(bp) => println!(
                    "{} Breakpoint {} on {}",
                    CHECK,
                    style(bp.name()).bold(),
                    bp.spec.debug.breakpoint.join(", ")
                ),
                None => println!("{} No breakpoint for {}", INFO, activity.name()),
            }
            return Ok(());
        }
        BreakpointCommand::Add(_) => {
            if let Some(bp) = &existing {
                println!("{} Breakpoint {} already exists", INFO, style(bp.name()).bold());
                return Ok(());
            }
            Some(actions.add_breakpoint())
        }
        BreakpointCommand::Remove(_) => existing.as_ref().map(|bp| actions.remove_breakpoint(bp)),
    };

    run_effect(cli, settings, store, effect).await
}

/// Execute an effect, or print it with `--dry-run`/`--json`
async fn run_effect(
    cli: &Cli,
    settings: &Settings,
    breakpoints: FileBreakpointStore,
    effect: Option<Effect>,
) -> Result<()> {
    let Some(effect) = effect else {
        println!("{} Nothing to do (run with --verbose for details)", WARN);
        return Ok(());
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&effect)?);
        if cli.dry_run {
            return Ok(());
        }
    }

    let mut executor: Box<dyn EffectExecutor> = if cli.dry_run {
        println!("{}", format_effect(&effect));
        Box::new(DryRunHost::new())
    } else {
        Box::new(SubprocessHost::new(settings.kubectl.clone(), Box::new(breakpoints)))
    };

    match executor.execute(effect).await {
        Ok(()) => Ok(()),
        Err(e) => {
            println!("{} {}", CROSS, style(&e).red());
            Err(e.into())
        }
    }
}
