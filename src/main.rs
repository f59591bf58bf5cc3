use std::rc::Rc;

use anyhow::{Context as _, Result};
use futures::executor::LocalPool;
use futures::future::join_all;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

use hunk::config::ConfigStore;
use hunk::git::GitRepository;
use hunk::item::{FilePatchItem, ItemDeps};
use hunk::opener::FilePatchOpener;
use hunk::pane::PaneItem as _;
use hunk::presenter::TextPresenter;
use hunk::root::{Repository, RootContext, WorkspaceRoot};
use hunk::state::AppStateStore;

fn main() -> Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::DEBUG.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .init();

    run(std::env::args().skip(1).collect())
}

fn run(uris: Vec<String>) -> Result<()> {
    let config = ConfigStore::new()?.load_or_create_default()?;
    let state_store = AppStateStore::new()?;
    let mut state = state_store.load_or_default()?;

    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let root = Rc::new(WorkspaceRoot::new(RootContext::standalone(Some(cwd.clone()))));
    match GitRepository::discover(&cwd, config.diff_context_lines) {
        Ok(repository) => {
            info!("using git repository at {}", repository.root().display());
            state.last_project_path = Some(repository.root().to_path_buf());
            let repository: Rc<dyn Repository> = Rc::new(repository);
            root.set_repository(Some(repository));
        }
        Err(err) => warn!("no repository for {}: {err:#}", cwd.display()),
    }

    let mut pool = LocalPool::new();
    let presenter = TextPresenter::new();
    let opener = FilePatchOpener::new(ItemDeps {
        root,
        presenter: Rc::new(presenter.clone()),
        spawner: Rc::new(pool.spawner()),
    });

    let items = if uris.is_empty() {
        if config.restore_open_items {
            opener.restore_all(&state.open_items)
        } else {
            Vec::new()
        }
    } else {
        uris.iter()
            .filter_map(|uri| {
                let item = opener.open(uri);
                if item.is_none() {
                    error!("cannot open {uri}: not a file patch locator");
                }
                item
            })
            .collect::<Vec<FilePatchItem>>()
    };

    let outcomes = pool.run_until(join_all(items.iter().map(|item| item.assembly())));
    for (item, outcome) in items.iter().zip(outcomes) {
        println!("{}", item.title());
        match outcome {
            Ok(()) => {
                for line in presenter.rendered(item.element().id()).unwrap_or_default() {
                    println!("{line}");
                }
            }
            Err(err) => println!("  {err}"),
        }
        println!();
    }

    state.open_items = items.iter().map(|item| item.serialize()).collect();
    state_store.save(&state)?;

    for item in &items {
        item.destroy();
    }
    Ok(())
}
