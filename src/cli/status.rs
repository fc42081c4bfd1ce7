//! Provider status command.

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::facade::Capabilities;
use crate::provider::ProviderKind;
use crate::utils::preflight::credential_report;
use crate::utils::settings::ChatSettings;

/// Shows provider credential and connection state.
#[derive(Parser)]
pub struct StatusCommand {
    /// Skips bring-up and only checks credentials.
    #[arg(long)]
    pub credentials_only: bool,
}

impl StatusCommand {
    /// Executes the status command.
    pub async fn execute(self, settings: &ChatSettings, capabilities: &Capabilities) -> Result<()> {
        let mut stdout = StandardStream::stdout(ColorChoice::Auto);

        writeln!(stdout, "Credentials:")?;
        for (kind, check) in credential_report(settings) {
            match check {
                Ok(()) => print_line(&mut stdout, kind, Color::Green, "ok")?,
                Err(e) => print_line(&mut stdout, kind, Color::Yellow, &e.to_string())?,
            }
        }

        if self.credentials_only {
            return Ok(());
        }

        capabilities.bring_up().await;

        writeln!(stdout, "\nProviders:")?;
        let music = capabilities.music().handle().await;
        print_line(
            &mut stdout,
            ProviderKind::MusicCatalog,
            state_color(music.is_connected()),
            &music.describe(),
        )?;
        let text = capabilities.text().handle().await;
        print_line(
            &mut stdout,
            ProviderKind::TextGeneration,
            state_color(text.is_connected()),
            &text.describe(),
        )?;

        writeln!(stdout, "\nRegion: {}", capabilities.region())?;
        Ok(())
    }
}

fn state_color(connected: bool) -> Color {
    if connected {
        Color::Green
    } else {
        Color::Red
    }
}

fn print_line(
    stdout: &mut StandardStream,
    kind: ProviderKind,
    color: Color,
    detail: &str,
) -> Result<()> {
    write!(stdout, "  {kind}: ")?;
    stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    writeln!(stdout, "{detail}")?;
    stdout.reset()?;
    Ok(())
}
