use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use stint_core::*;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "stint")]
#[command(about = "Daily study tracker with streaks and achievements", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log (or edit) the hours studied on a day
    Log {
        /// Hours studied, 0 to 24
        hours: f64,

        /// Day to log (defaults to today, UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Set the daily goal in hours
    Goal {
        /// New daily goal, must be greater than 0
        hours: f64,
    },

    /// Show current and longest streaks
    Streaks,

    /// Show XP, level, and totals
    Progress,

    /// Show achievements unlocked since the last check
    Check,

    /// List all achievement tiers and their status
    Achievements,

    /// Export the full history as CSV
    Export {
        /// Output file (defaults to history.csv in the data directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Delete all logged activity and achievements
    Clear {
        /// Required confirmation
        #[arg(long)]
        yes: bool,
    },
}

/// Everything a command needs: hydrated stores plus the paths to persist to
struct Workspace {
    journal_path: PathBuf,
    state_path: PathBuf,
    user_id: Uuid,
    activity: MemoryActivityStore,
    achievements: MemoryAchievementStore,
    profiles: MemoryProfileStore,
}

impl Workspace {
    /// Open a data directory: load or create the profile, replay the
    /// journal, and hydrate the achievement store from the state file.
    fn open(data_dir: &Path, config: &Config) -> Result<Self> {
        let errors = get_default_catalog().validate();
        if !errors.is_empty() {
            return Err(Error::CatalogValidation(errors.join("; ")));
        }

        std::fs::create_dir_all(data_dir)?;
        let journal_path = data_dir.join("activity.jsonl");
        let state_path = data_dir.join("state.json");

        let mut state = UserState::load(&state_path)?;
        let profile = match &state.profile {
            Some(profile) => profile.clone(),
            None => {
                let profile = UserProfile {
                    user_id: Uuid::new_v4(),
                    name: std::env::var("USER").unwrap_or_else(|_| "studier".into()),
                    daily_goal_hours: config.goal.default_daily_goal_hours,
                };
                tracing::info!("Created profile for {}", profile.name);
                state.profile = Some(profile.clone());
                state.save(&state_path)?;
                profile
            }
        };

        let activity = journal::load_activity(&journal_path)?;
        let achievements = MemoryAchievementStore::from_records(state.achievements.clone());
        let mut profiles = MemoryProfileStore::new();
        let user_id = profile.user_id;
        profiles.insert(profile);

        Ok(Self {
            journal_path,
            state_path,
            user_id,
            activity,
            achievements,
            profiles,
        })
    }

    /// Write the current achievement records (and profile) back to the
    /// state file
    fn persist(&self) -> Result<()> {
        UserState::update(&self.state_path, |state| {
            state.profile = self.profiles.get(self.user_id).cloned();
            state.achievements = self.achievements.all_records();
            Ok(())
        })?;
        Ok(())
    }

    fn reconcile(&mut self) -> Result<ReconcileSummary> {
        engine::reconcile(
            get_default_catalog(),
            &self.activity,
            &mut self.achievements,
            &self.profiles,
            self.user_id,
            Utc::now(),
        )
    }

    fn goal_hours(&self) -> Result<f64> {
        self.profiles.daily_goal_hours(self.user_id)
    }
}

fn main() {
    stint_core::logging::init("warn");

    let cli = Cli::parse();

    let result = Config::load().and_then(|config| {
        let data_dir = cli
            .data_dir
            .clone()
            .unwrap_or_else(|| config.data.data_dir.clone());
        run(&cli, &data_dir, &config)
    });

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, data_dir: &Path, config: &Config) -> Result<()> {
    let mut ws = Workspace::open(data_dir, config)?;

    match &cli.command {
        Commands::Log { hours, date } => cmd_log(&mut ws, *hours, *date),
        Commands::Goal { hours } => cmd_goal(&mut ws, *hours),
        Commands::Streaks => cmd_streaks(&ws),
        Commands::Progress => cmd_progress(&ws),
        Commands::Check => cmd_check(&mut ws),
        Commands::Achievements => cmd_achievements(&ws),
        Commands::Export { out } => cmd_export(&ws, out.clone(), data_dir),
        Commands::Clear { yes } => cmd_clear(&mut ws, *yes),
    }
}

fn cmd_log(ws: &mut Workspace, hours: f64, date: Option<NaiveDate>) -> Result<()> {
    engine::validate_hours(hours)?;
    let day = date.unwrap_or_else(|| Utc::now().date_naive());

    let mut journal = JsonlJournal::new(&ws.journal_path);
    journal.append(&JournalEvent::Logged {
        user_id: ws.user_id,
        day,
        hours,
        at: Utc::now(),
    })?;
    ws.activity.upsert(ws.user_id, day, hours)?;

    let summary = ws.reconcile()?;
    ws.persist()?;

    println!("✓ Logged {} hours for {}", hours, day);
    print_summary(&summary);
    Ok(())
}

fn cmd_goal(ws: &mut Workspace, hours: f64) -> Result<()> {
    engine::validate_goal(hours)?;

    ws.profiles.set_daily_goal_hours(ws.user_id, hours)?;
    let summary = ws.reconcile()?;
    ws.persist()?;

    println!("✓ Daily goal set to {} hours", hours);
    print_summary(&summary);
    Ok(())
}

fn cmd_streaks(ws: &Workspace) -> Result<()> {
    let today = Utc::now().date_naive();
    let summary = engine::streaks(&ws.activity, &ws.profiles, ws.user_id, today)?;

    println!("╭─────────────────────────────────────────╮");
    println!("│  STREAKS                                │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  Study days:  {} current, {} longest",
        summary.current_consistency, summary.longest_consistency
    );
    println!(
        "  Goal days:   {} current, {} longest",
        summary.current_goal, summary.longest_goal
    );
    Ok(())
}

fn cmd_progress(ws: &Workspace) -> Result<()> {
    let snapshot = engine::progression(&ws.activity, &ws.achievements, &ws.profiles, ws.user_id)?;
    let history = ws.activity.find_all_for_user(ws.user_id)?;
    let total_hours: f64 = history.iter().map(|r| r.hours).sum();
    let achieved = ws.achievements.find_all_for_user(ws.user_id)?.len();

    println!("╭─────────────────────────────────────────╮");
    println!("│  PROGRESS                               │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Level {}  ({} XP)", snapshot.level, snapshot.total_xp);
    println!("  {} days logged, {:.1} hours total", history.len(), total_hours);
    println!("  {} achievements earned", achieved);
    Ok(())
}

fn cmd_check(ws: &mut Workspace) -> Result<()> {
    let fresh = engine::poll_unnotified(&mut ws.achievements, ws.user_id)?;
    ws.persist()?;

    if fresh.is_empty() {
        println!("No new achievements.");
        return Ok(());
    }

    let catalog = get_default_catalog();
    for record in &fresh {
        match catalog.get(&record.achievement_id) {
            Some(def) => {
                println!("🏆 {}: {}", def.name, def.description);
                if let Some(goal) = record.goal_value_at_achievement {
                    println!("   Achieved with a daily goal of {} hours", goal);
                }
            }
            None => println!("🏆 {}", record.achievement_id),
        }
    }
    Ok(())
}

fn cmd_achievements(ws: &Workspace) -> Result<()> {
    let achieved: Vec<String> = ws
        .achievements
        .find_all_for_user(ws.user_id)?
        .into_iter()
        .map(|r| r.achievement_id)
        .collect();

    for def in &get_default_catalog().definitions {
        let marker = if achieved.contains(&def.id) { "✓" } else { " " };
        println!(
            "[{}] {} ({} days): {}",
            marker, def.name, def.required_consecutive_days, def.description
        );
    }
    Ok(())
}

fn cmd_export(ws: &Workspace, out: Option<PathBuf>, data_dir: &Path) -> Result<()> {
    let out = out.unwrap_or_else(|| data_dir.join("history.csv"));
    let goal = ws.goal_hours()?;

    let count = csv_export::export_history(&ws.activity, ws.user_id, goal, &out)?;
    println!("✓ Exported {} days to {}", count, out.display());
    Ok(())
}

fn cmd_clear(ws: &mut Workspace, yes: bool) -> Result<()> {
    if !yes {
        return Err(Error::InvalidInput(
            "refusing to clear without --yes".into(),
        ));
    }

    let mut journal = JsonlJournal::new(&ws.journal_path);
    journal.append(&JournalEvent::Cleared {
        user_id: ws.user_id,
        at: Utc::now(),
    })?;
    ws.activity.delete_all_for_user(ws.user_id)?;

    let summary = ws.reconcile()?;
    ws.persist()?;

    println!("✓ Cleared all activity");
    if !summary.revoked.is_empty() {
        println!("  {} achievements revoked", summary.revoked.len());
    }
    Ok(())
}

fn print_summary(summary: &ReconcileSummary) {
    let catalog = get_default_catalog();

    for id in &summary.unlocked {
        match catalog.get(id) {
            Some(def) => println!("🏆 Unlocked: {}: {}", def.name, def.description),
            None => println!("🏆 Unlocked: {}", id),
        }
    }
    for id in &summary.revoked {
        match catalog.get(id) {
            Some(def) => println!("  Revoked: {} (streak no longer holds)", def.name),
            None => println!("  Revoked: {}", id),
        }
    }
}
