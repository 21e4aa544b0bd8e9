use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    execute,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
};
use formgate_core::{Banner, BannerKind, Page, SubmitOutcome};

// Banner colors
const SUCCESS: Color = Color::Rgb { r: 96, g: 160, b: 96 };
const ERROR: Color = Color::Rgb { r: 192, g: 64, b: 64 };

fn banner_color(kind: BannerKind) -> Color {
    match kind {
        BannerKind::Success => SUCCESS,
        BannerKind::Error => ERROR,
    }
}

/// Print the banner for the notification region to stderr.
pub fn print_banner(region: &str, banner: &Banner) -> Result<()> {
    let mut stderr = io::stderr();
    execute!(
        stderr,
        SetForegroundColor(banner_color(banner.kind)),
        SetAttribute(Attribute::Bold),
        Print(format!("#{} [{}] ", region, banner.kind.css_class())),
        SetAttribute(Attribute::Reset),
        SetForegroundColor(banner_color(banner.kind)),
        Print(&banner.text),
        ResetColor,
        Print("\n"),
    )?;
    Ok(())
}

pub fn print_outcome(notification_region: &str, user_list_region: &str, outcome: &SubmitOutcome) -> Result<()> {
    match outcome {
        SubmitOutcome::Notified(banner) | SubmitOutcome::Failed(banner) => {
            print_banner(notification_region, banner)
        }
        SubmitOutcome::Rendered(markup) => {
            let mut stdout = io::stdout();
            writeln!(stdout, "#{}", user_list_region)?;
            writeln!(stdout, "{}", markup)?;
            Ok(())
        }
    }
}

pub fn print_forms(page: &Page) {
    if page.forms.is_empty() {
        println!("No forms defined");
        return;
    }
    for form in &page.forms {
        println!(
            "{:<24} {:<10} {:<6} {}",
            form.id.as_deref().unwrap_or("-"),
            page.role_of(form).label(),
            form.method().as_str(),
            form.action
        );
    }
}
