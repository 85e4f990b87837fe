use std::{sync::Arc, time::Duration};

use flume::{Receiver, Sender};
use ratatui::layout::Rect;
use tracing::{debug, info};

use crate::{
    config::AppConfig,
    event::events::Event,
    favorites::FavoritesStore,
    http::{ApiService, LyricsLookup},
    karaoke::Speed,
    storage::FileStore,
    util::task::{LOOKUP_TASK, TICKER_TASK, TaskManager},
};

use super::{
    context::AppContext,
    layout::{self, AppLayout},
    message::{AppMessage, Command},
    router::Router,
    state::AppState,
    tui,
    util::handler::EventHandler,
    views,
};

pub struct App {
    pub state: AppState,
    pub ctx: AppContext,
    pub router: Router,
    pub event_rx: Receiver<Event>,
    pub task_manager: TaskManager,
    pub has_focus: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> color_eyre::Result<Self> {
        let api = ApiService::new(&config.api)?;
        let has_credential = api.has_credential();
        info!(
            "Using model {} with favorites in {}",
            config.api.model,
            config.data_dir.display()
        );

        let favorites = FavoritesStore::new(FileStore::new(&config.data_dir));
        Ok(Self::with_services(
            Arc::new(api),
            has_credential,
            favorites,
            config.speed,
        ))
    }

    pub fn with_services(
        api: Arc<dyn LyricsLookup>,
        has_credential: bool,
        favorites: FavoritesStore,
        speed: Speed,
    ) -> Self {
        let (event_tx, event_rx) = flume::unbounded();
        let state = AppState::new(favorites.load_all(), has_credential, speed);

        let mut router = Router::new(vec![
            Box::new(views::Search),
            Box::new(views::Favorites::default()),
        ]);
        if state.ui.config_error {
            router.set_overlay(Box::new(views::ConfigError));
        }

        Self {
            state,
            ctx: AppContext {
                api,
                favorites,
                event_tx,
            },
            router,
            event_rx,
            task_manager: TaskManager::new(),
            has_focus: true,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = tui::Tui::new()?;
        tui.enter()?;

        let mut redraw = true;
        while !self.should_quit {
            let size = tui.size()?;
            let screen = Rect::new(0, 0, size.width, size.height);
            let viewport = layout::lyrics_viewport(screen, &self.state);
            self.update(AppMessage::Resize {
                width: viewport.width,
                height: viewport.height,
            });

            if redraw && self.has_focus {
                tui.draw(|f| {
                    let area = f.area();
                    AppLayout::new(self).render(f, area);
                })?;
            }

            redraw = EventHandler::handle_events(self, &mut tui).await?;
        }

        self.task_manager.abort_all();
        tui.exit()?;
        Ok(())
    }

    /// Applies a message to the state and carries out whatever it asks for.
    pub fn update(&mut self, msg: AppMessage) {
        for command in self.state.update(msg) {
            self.execute(command);
        }

        if self.state.ui.config_error && !self.router.has_overlay() {
            self.router.set_overlay(Box::new(views::ConfigError));
        }
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Lookup { request_id, query } => {
                let api = self.ctx.api.clone();
                let event_tx = self.ctx.event_tx.clone();
                self.task_manager.spawn(
                    LOOKUP_TASK,
                    tokio::spawn(async move {
                        let result = api.lookup(&query).await;
                        if event_tx
                            .send_async(Event::LyricsFetched { request_id, result })
                            .await
                            .is_err()
                        {
                            debug!("Lookup #{} finished after shutdown", request_id);
                        }
                    }),
                );
            }
            Command::PersistFavorites(favorites) => self.ctx.favorites.save_all(&favorites),
            Command::StartTicker(period) => {
                debug!("Karaoke ticking every {:?}", period);
                let event_tx = self.ctx.event_tx.clone();
                self.task_manager
                    .spawn(TICKER_TASK, tokio::spawn(run_ticker(event_tx, period)));
            }
            Command::StopTicker => self.task_manager.abort(TICKER_TASK),
            Command::Quit => self.should_quit = true,
        }
    }
}

async fn run_ticker(event_tx: Sender<Event>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    // the first tick completes immediately
    interval.tick().await;
    loop {
        interval.tick().await;
        if event_tx.send_async(Event::ScrollTick).await.is_err() {
            break;
        }
    }
}
