use tracing::{error, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub struct Logger {}

impl Logger {
    pub fn initialize(is_development: bool) -> anyhow::Result<()> {
        Self::set_subscriber(is_development)?;

        std::panic::set_hook(Box::new(|panic| {
            // If the panic has a source location, record it as structured fields.
            if let Some(location) = panic.location() {
                error!(
                    message = %panic,
                    panic.file = location.file(),
                    panic.line = location.line(),
                    panic.column = location.column(),
                );
            } else {
                error!(message = %panic);
            }
        }));

        Ok(())
    }

    fn set_subscriber(is_development: bool) -> anyhow::Result<()> {
        let mut filter = EnvFilter::from_default_env()
            .add_directive("serenity=warn".parse()?)
            .add_directive("poise=warn".parse()?)
            .add_directive(Level::INFO.into());

        if is_development {
            for target in ["apis", "bot", "utility", "edenmon"] {
                filter = filter.add_directive(format!("{target}=debug").parse()?);
            }

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::Layer::new().with_writer(std::io::stdout).pretty())
                .try_init()?;
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::Layer::new()
                        .with_writer(std::io::stdout)
                        .with_target(true),
                )
                .try_init()?;
        }

        Ok(())
    }
}
