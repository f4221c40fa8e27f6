use anyhow::Result;
use replf::complete::symbols::SymbolOracle;
use replf::config::Config;
use replf::editor::{LineEditor, ReadConfig, ReadOutcome};
use replf::frontend::{Frontend, PipedFrontend, TerminalFrontend};
use replf::history::HistoryFile;
use replf::logging;
use std::io::{self, IsTerminal};
use tracing::{debug, warn};

struct Session {
    config: Config,
    history_file: Option<HistoryFile>,
    oracle: SymbolOracle,
    results: usize,
}

impl Session {
    fn new(config: Config) -> Self {
        let history_file = config
            .history_enabled
            .then(|| HistoryFile::new(config.history_path.clone()));
        Self {
            config,
            history_file,
            oracle: SymbolOracle::new(),
            results: 0,
        }
    }

    fn load_seed(&self) -> Vec<String> {
        let Some(file) = &self.history_file else {
            return Vec::new();
        };
        match file.load_seed(self.config.max_seed) {
            Ok(seed) => seed,
            Err(err) => {
                warn!(path = %file.path().display(), error = %err, "history not loaded");
                Vec::new()
            }
        }
    }

    fn persist_last<F: Frontend>(&self, editor: &LineEditor<F>) {
        let (Some(file), Some(entry)) = (&self.history_file, editor.history().entries().last())
        else {
            return;
        };
        if let Err(err) = file.append(entry) {
            warn!(path = %file.path().display(), error = %err, "history not saved");
        }
    }

    fn run<F: Frontend>(&mut self, mut editor: LineEditor<F>) -> Result<()> {
        let scheme = self.config.color_scheme();
        let prompt = self.config.prompt.clone();
        let mut seed = self.load_seed();
        debug!(seeded = seed.len(), "session started");

        loop {
            let config = ReadConfig {
                scheme: &scheme,
                oracle: &self.oracle,
                history_seed: &seed,
            };
            let submitted = editor.history().submitted().count();
            let outcome = editor.read_statement(&prompt, &config);
            seed.clear();
            if editor.history().submitted().count() > submitted {
                self.persist_last(&editor);
            }

            match outcome {
                ReadOutcome::Success { text, tokens } => {
                    for token in &tokens {
                        self.oracle.learn(token);
                    }
                    self.results += 1;
                    editor
                        .frontend_mut()
                        .print_line(&format!("res{}: {text}", self.results))?;
                }
                ReadOutcome::Failure(message) => {
                    editor.frontend_mut().print_line(&message)?;
                }
                ReadOutcome::Skip => {}
                ReadOutcome::Exit(reason) => {
                    debug!(?reason, "session ended");
                    return Ok(());
                }
            }
        }
    }
}

fn main() -> Result<()> {
    let config = Config::load()?;
    config.validate()?;
    logging::init();

    let viewport_rows = config.viewport_rows;
    let mut session = Session::new(config);

    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        let frontend = TerminalFrontend::new(viewport_rows)?;
        session.run(LineEditor::new(frontend))
    } else {
        let frontend = PipedFrontend::new(io::stdin().lock(), io::stdout());
        session.run(LineEditor::new(frontend))
    }
}
