use std::io::{self, BufRead, IsTerminal};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::bail;
use chrono::Utc;
use clap::Parser;
use scout_core::{
    update, AppState, AppViewModel, Msg, OpenStrategy, ProfitField, ScheduleStatus,
    SessionSettings, SubscriptionField, SubscriptionStatus,
};
use scout_engine::{
    AnalyticsSink, ContextRelay, HttpCollector, LogSink, Navigation, Navigator,
    RecordingNavigator, SystemBrowser,
};
use scout_logging::{scout_debug, scout_info, scout_warn};

use super::cli::{Cli, Command, NavigationArgs, ProfitArgs, ResumeArgs, SearchArgs, SubscribeArgs};
use super::config::{self, ScoutConfig};
use super::effects::EffectRunner;
use super::logging;
use super::ui::render;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let loaded = config::load(cli.config.as_deref())?;
    logging::initialize(
        cli.log.unwrap_or(loaded.config.log),
        logging::level_for_verbosity(cli.verbose),
    );
    match &loaded.source {
        Some(path) => scout_info!("Loaded config from {:?}", path),
        None => scout_debug!("No config file found; using defaults"),
    }
    let config = loaded.config;

    match cli.command {
        Command::Search(args) => run_search(&config, args),
        Command::Resume(args) => run_resume(&config, args),
        Command::Profit(args) => run_profit(&config, args),
        Command::Subscribe(args) => run_subscribe(&config, args),
        Command::Marketplaces => {
            print_lines(&render::render_catalog(&config.catalog()));
            Ok(())
        }
    }
}

fn run_search(config: &ScoutConfig, args: SearchArgs) -> anyhow::Result<()> {
    let mut settings = config.session_settings();
    if let Some(throttle_ms) = args.throttle_ms {
        settings.throttle = Duration::from_millis(throttle_ms);
    }
    if let Some(strategy) = args.strategy {
        settings.strategy = strategy.into();
    }
    settings.links_only |= args.links_only;
    let paced = settings.strategy == OpenStrategy::Queue
        && !settings.throttle.is_zero()
        && !settings.links_only;

    let contexts = Contexts::new(Some(&args.navigation));
    let mut session = contexts.session(config, settings.clone());
    let catalog = session.state.catalog().clone();

    let mut msgs = vec![Msg::SearchTermChanged(args.term.join(" "))];
    msgs.extend(args.min.map(Msg::MinPriceChanged));
    msgs.extend(args.max.map(Msg::MaxPriceChanged));
    let marketplaces = if args.marketplaces.is_empty() {
        catalog.iter().map(|m| m.id).collect()
    } else {
        args.marketplaces
    };
    for marketplace in marketplaces {
        if catalog.get(marketplace).is_none() {
            bail!("Marketplace {marketplace} is not in the configured catalog");
        }
        msgs.push(Msg::MarketplaceToggled {
            marketplace,
            selected: true,
        });
    }
    for condition in args.conditions {
        msgs.push(Msg::ConditionToggled {
            condition,
            checked: true,
        });
    }
    for msg in msgs {
        session.dispatch(msg);
    }
    if !session.state.view().can_search {
        bail!("Nothing to search: enter a term and select at least one marketplace");
    }

    session.dispatch(Msg::SearchSubmitted);
    let controls = if paced { spawn_controls() } else { None };
    session.settle(controls.as_ref());
    let chained = contexts.follow(config, &settings);
    session.print_results();
    contexts.print_summary(chained);
    Ok(())
}

fn run_resume(config: &ScoutConfig, args: ResumeArgs) -> anyhow::Result<()> {
    let mut settings = config.session_settings();
    settings.links_only |= args.links_only;

    let contexts = Contexts::new(Some(&args.navigation));
    let mut session = contexts.session(config, settings.clone());
    session.dispatch(Msg::AddressLoaded(args.address));
    session.settle(None);
    if session.state.view().current_address.is_none() {
        println!("No continuation state in that address.");
        return Ok(());
    }
    let chained = contexts.follow(config, &settings);
    session.print_results();
    contexts.print_summary(chained);
    Ok(())
}

fn run_profit(config: &ScoutConfig, args: ProfitArgs) -> anyhow::Result<()> {
    let mut session = Contexts::new(None).session(config, config.session_settings());
    for (field, value) in [
        (ProfitField::Cogs, args.cogs),
        (ProfitField::AmazonPrice, args.amazon),
        (ProfitField::EbayPrice, args.ebay),
    ] {
        session.dispatch(Msg::ProfitInputChanged { field, value });
    }
    session.dispatch(Msg::ProfitCalculateClicked);
    session.settle(None);
    print_lines(&render::render_profit(&session.state.view().profit));
    Ok(())
}

fn run_subscribe(config: &ScoutConfig, args: SubscribeArgs) -> anyhow::Result<()> {
    let mut session = Contexts::new(None).session(config, config.session_settings());
    session.dispatch(Msg::AudienceModeChanged(args.audience.into()));
    for (field, value) in [
        (SubscriptionField::FirstName, args.first_name),
        (SubscriptionField::LastName, args.last_name),
        (SubscriptionField::Email, args.email),
    ] {
        session.dispatch(Msg::SubscriptionFieldChanged { field, value });
    }
    session.dispatch(Msg::SubscriptionSubmitted);
    session.settle(None);

    let view = session.state.view();
    print_lines(&render::render_subscription(&view.subscription));
    if let Some(SubscriptionStatus::Rejected(reason)) = view.subscription.status {
        bail!("Subscription rejected: {reason}");
    }
    Ok(())
}

/// Browsing contexts of one command. A hand-off opens a new context, which
/// here is a fresh [`Session`] loading the carried address.
struct Contexts {
    browser: Arc<dyn Navigator>,
    recorder: Option<RecordingNavigator>,
    opened_tx: mpsc::Sender<String>,
    pending: mpsc::Receiver<String>,
}

impl Contexts {
    fn new(navigation: Option<&NavigationArgs>) -> Self {
        let recorder = navigation
            .filter(|args| args.dry_run)
            .map(|args| RecordingNavigator::blocking(args.blocked.clone()));
        let browser: Arc<dyn Navigator> = match &recorder {
            Some(recorder) => Arc::new(recorder.clone()),
            None => Arc::new(SystemBrowser::default()),
        };
        let (opened_tx, pending) = mpsc::channel();
        Self {
            browser,
            recorder,
            opened_tx,
            pending,
        }
    }

    fn session(&self, config: &ScoutConfig, settings: SessionSettings) -> Session {
        let relay = ContextRelay::new(self.browser.clone(), self.opened_tx.clone())
            .rehearsing(self.recorder.is_some());
        Session {
            state: AppState::with_settings(settings, config.catalog()),
            runner: EffectRunner::new(Arc::new(relay), analytics_sink(config)),
            progress: None,
        }
    }

    /// Runs every queued hand-off context to completion, in the order they
    /// were opened. Returns how many marketplace pages the chain opened.
    fn follow(&self, config: &ScoutConfig, settings: &SessionSettings) -> usize {
        let mut opened = 0;
        while let Ok(address) = self.pending.try_recv() {
            scout_debug!("Loading hand-off context {}", address);
            let mut session = self.session(config, settings.clone());
            session.dispatch(Msg::AddressLoaded(address));
            session.settle(None);
            let view = session.state.view();
            if let Some(notice) = &view.notice {
                println!("{notice}");
            }
            opened += view.opened_count;
        }
        opened
    }

    fn print_summary(&self, chained: usize) {
        if chained > 0 {
            println!("Opened {chained} more through the hand-off chain.");
        }
        if let Some(recorder) = &self.recorder {
            println!("Dry run, nothing was opened. Navigations:");
            for navigation in recorder.navigations() {
                match navigation {
                    Navigation::NewContext { url, target } => {
                        println!("  new tab {:<10} {url}", target.to_string());
                    }
                    Navigation::Current { url } => println!("  this tab   {url}"),
                }
            }
        }
    }
}

/// One browsing context's worth of state, effects and engine.
struct Session {
    state: AppState,
    runner: EffectRunner,
    progress: Option<String>,
}

impl Session {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        self.runner.enqueue(effects);
        if was_dirty {
            let view = self.state.view();
            self.report_progress(&view);
        }
    }

    fn report_progress(&mut self, view: &AppViewModel) {
        let line = render::progress_line(view);
        if line != self.progress {
            if let Some(line) = &line {
                println!("{line}");
            }
            self.progress = line;
        }
    }

    /// Pumps engine events until nothing more is expected, then shuts the
    /// engine down. A stopped schedule keeps the session open only while
    /// `controls` can still resume or reset it.
    fn settle(&mut self, controls: Option<&mpsc::Receiver<Msg>>) {
        while self.is_waiting(controls.is_some()) {
            if let Some(controls) = controls {
                while let Ok(msg) = controls.try_recv() {
                    self.dispatch(msg);
                }
            }
            match self.runner.poll(POLL_INTERVAL) {
                Some(msg) => self.dispatch(msg),
                None if !self.runner.is_alive() => {
                    scout_warn!("Engine stopped before the session settled");
                    break;
                }
                None => {}
            }
        }
        for msg in self.runner.finish() {
            self.dispatch(msg);
        }
    }

    fn is_waiting(&self, interactive: bool) -> bool {
        self.state.is_busy()
            || (interactive && matches!(self.state.schedule(), ScheduleStatus::Stopped { .. }))
    }

    fn print_results(&self) {
        print_lines(&render::render_results(&self.state.view()));
    }
}

fn analytics_sink(config: &ScoutConfig) -> Arc<dyn AnalyticsSink> {
    let Some(endpoint) = &config.analytics_endpoint else {
        return Arc::new(LogSink);
    };
    match HttpCollector::new(
        endpoint,
        config.base_address.clone(),
        Arc::new(|| Utc::now().to_rfc3339()),
    ) {
        Ok(collector) => Arc::new(collector),
        Err(err) => {
            scout_warn!("Analytics falls back to the log: {}", err);
            Arc::new(LogSink)
        }
    }
}

/// Reads stop/resume/reset from an interactive stdin while a paced search runs.
fn spawn_controls() -> Option<mpsc::Receiver<Msg>> {
    if !io::stdin().is_terminal() {
        return None;
    }
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let Some(msg) = control_msg(&line) else {
                if !line.trim().is_empty() {
                    println!("Commands: stop, resume, reset");
                }
                continue;
            };
            if tx.send(msg).is_err() {
                break;
            }
        }
    });
    Some(rx)
}

fn control_msg(line: &str) -> Option<Msg> {
    match line.trim().to_ascii_lowercase().as_str() {
        "stop" | "s" => Some(Msg::StopClicked),
        "resume" | "r" => Some(Msg::ResumeClicked),
        "reset" | "x" => Some(Msg::ResetClicked),
        _ => None,
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
