//! A command-line front end to a local task store

use std::error::Error;
use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use clap::{Parser, Subcommand};

use taskboard::calendar::{self, Month, MonthGrid};
use taskboard::client::{Client, RemoteTask};
use taskboard::storage::FileStorage;
use taskboard::utils::{print_month_grid, print_task, print_task_list};
use taskboard::utils::comparison::SortOrder;
use taskboard::{CategoryId, Priority, Task, TaskId, TaskStore};

#[derive(Parser, Debug)]
#[command(name = "taskboard", version, about = "Manage your tasks, by day or by month")]
struct Cli {
    /// Folder the tasks are saved into
    #[arg(long, env = "TASKBOARD_FOLDER")]
    folder: Option<PathBuf>,

    /// Base URL of the remote task API
    #[arg(long, env = "TASKBOARD_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every task, or only the tasks of a category
    List {
        #[arg(long)]
        category: Option<String>,
        /// added, date, priority or title
        #[arg(long, default_value = "added")]
        sort: SortOrder,
    },
    /// List the tasks of today
    Today,
    /// List the tasks of a given day (YYYY-MM-DD)
    Day { date: NaiveDate },
    /// List the tasks of today and later, day by day
    Upcoming,
    /// Show a month (YYYY-MM, defaults to the current month)
    Month { month: Option<String> },
    /// Create a task
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Local date and time ("YYYY-MM-DD HH:MM"), defaults to now
        #[arg(long)]
        at: Option<String>,
        #[arg(long, default_value = "medium")]
        priority: Priority,
        #[arg(long)]
        category: Option<String>,
    },
    /// Change some fields of a task
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        at: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long, conflicts_with = "no_category")]
        category: Option<String>,
        /// Remove the category of the task
        #[arg(long)]
        no_category: bool,
    },
    /// Mark a task as completed (or uncompleted)
    Toggle { id: String },
    /// Delete a task
    Delete { id: String },
    /// Delete every task
    Clear,
    /// List the categories
    Categories,
    /// Talk to the remote task API
    #[command(subcommand)]
    Remote(RemoteCommand),
}

#[derive(Subcommand, Debug)]
enum RemoteCommand {
    /// List the remote tasks
    List,
    /// Create a remote copy of a local task
    Push { id: String },
}


#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(url) = cli.api_url {
        taskboard::config::set(&taskboard::config::API_URL, url);
    }
    let storage = match &cli.folder {
        Some(folder) => FileStorage::new(folder),
        None => FileStorage::default_folder(),
    };
    let mut store = TaskStore::load(storage).await;
    let now = Local::now();

    match cli.command {
        Command::List{ category, sort } => {
            let tasks = match category {
                None => sort.sort(store.tasks()),
                Some(cat) => sort.sort(store.tasks_in_category(&CategoryId::from(cat))),
            };
            print_task_list(tasks, store.categories(), &Local);
        },
        Command::Today => {
            println!("Today, {}", now.format("%A, %B %-d"));
            print_task_list(calendar::tasks_on_date(store.tasks(), &now), store.categories(), &Local);
        },
        Command::Day{ date } => {
            println!("Tasks for {}", date.format("%B %-d, %Y"));
            print_task_list(calendar::tasks_on_day(store.tasks(), date, &Local), store.categories(), &Local);
        },
        Command::Upcoming => {
            let upcoming = calendar::tasks_on_or_after(store.tasks(), &now);
            for (day, tasks) in calendar::tasks_by_day(upcoming, &Local) {
                println!("{}", day.format("%a %Y-%m-%d"));
                print_task_list(tasks, store.categories(), &Local);
            }
        },
        Command::Month{ month } => {
            let month = match month {
                None => Month::containing(now.date_naive()).ok_or("The current month cannot be displayed")?,
                Some(text) => parse_month(&text)?,
            };
            let grid = MonthGrid::new(month);
            let marked = grid.days_with_tasks(store.tasks(), &Local);
            print_month_grid(&grid, &marked);
        },
        Command::Add{ title, description, at, priority, category } => {
            let date = match at {
                None => now.with_timezone(&Utc),
                Some(text) => parse_local_datetime(&text)?,
            };
            let mut task = Task::new(title, date);
            task.set_description(description);
            task.set_priority(priority);
            task.set_category(category.map(CategoryId::from));
            let id = task.id().clone();
            store.add_task(task).await?;
            println!("Created task {}", id);
        },
        Command::Edit{ id, title, description, at, priority, category, no_category } => {
            let id = TaskId::from(id);
            let mut task = store.task(&id)
                .cloned()
                .ok_or_else(|| format!("No task with ID {}", id))?;
            if let Some(title) = title {
                task.set_title(title);
            }
            if description.is_some() {
                task.set_description(description);
            }
            if let Some(text) = at {
                task.set_date(parse_local_datetime(&text)?);
            }
            if let Some(priority) = priority {
                task.set_priority(priority);
            }
            if no_category {
                task.set_category(None);
            } else if let Some(cat) = category {
                task.set_category(Some(CategoryId::from(cat)));
            }
            store.update_task(task).await?;
            if let Some(task) = store.task(&id) {
                print_task(task, store.categories(), &Local);
            }
        },
        Command::Toggle{ id } => {
            let id = TaskId::from(id);
            store.toggle_task_completion(&id).await?;
            if let Some(task) = store.task(&id) {
                print_task(task, store.categories(), &Local);
            }
        },
        Command::Delete{ id } => {
            store.delete_task(&TaskId::from(id)).await?;
        },
        Command::Clear => {
            let n_tasks = store.len();
            store.clear_all_tasks().await?;
            println!("{} tasks deleted", n_tasks);
        },
        Command::Categories => {
            for category in store.categories() {
                println!("    {}  {:<10} {} ({} tasks)", category.id(), category.name(), category.color().to_hex_string(), store.task_count_in_category(category.id()));
            }
        },
        Command::Remote(RemoteCommand::List) => {
            let client = Client::from_config()?;
            for task in client.list_tasks().await? {
                let completion = if task.completed { "✓" } else { " " };
                println!("    {} {:<6} {:<40} {}", completion, task.priority.as_str(), task.title, task.id.unwrap_or_default());
            }
        },
        Command::Remote(RemoteCommand::Push{ id }) => {
            let id = TaskId::from(id);
            let task = store.task(&id)
                .ok_or_else(|| format!("No task with ID {}", id))?;
            let client = Client::from_config()?;
            let created = client.create_task(&RemoteTask::from(task)).await?;
            println!("Created remote task {}", created.id.unwrap_or_default());
        },
    }

    Ok(())
}

/// Parse a "YYYY-MM-DD HH:MM" local time
fn parse_local_datetime(text: &str) -> Result<DateTime<Utc>, Box<dyn Error>> {
    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M")?;
    match Local.from_local_datetime(&naive).earliest() {
        Some(local) => Ok(local.with_timezone(&Utc)),
        None => Err(format!("{} does not exist in the local time zone", text).into()),
    }
}

/// Parse a "YYYY-MM" month
fn parse_month(text: &str) -> Result<Month, Box<dyn Error>> {
    let first_day = NaiveDate::parse_from_str(&format!("{}-01", text), "%Y-%m-%d")?;
    Month::containing(first_day).ok_or_else(|| format!("Month {} cannot be displayed", text).into())
}
