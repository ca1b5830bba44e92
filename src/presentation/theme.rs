use colored::Colorize;

pub struct Theme {
    pub title: fn(&str) -> String,
    pub label: fn(&str) -> String,
    pub line: fn(&str) -> String,
    pub body: fn(&str) -> String,
    pub source: fn(&str) -> String,
    pub error: fn(&str) -> String,
    pub hint: fn(&str) -> String,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "temp" | "" => Self::temp(),
            "ink" => Self::ink(),
            "canvas" => Self::canvas(),
            _ => {
                eprintln!("{}", format!("✘ Unknown theme: {}", name).red());
                Self::temp()
            }
        }
    }

    fn temp() -> Self {
        Self {
            title: |s| s.bright_magenta().italic().bold().underline().to_string(),
            label: |s| s.cyan().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            body: |s| s.white().to_string(),
            source: |s| s.bright_white().dimmed().italic().to_string(),
            error: |s| s.red().bold().to_string(),
            hint: |s| s.yellow().to_string(),
        }
    }

    fn ink() -> Self {
        Self {
            title: |s| s.red().italic().bold().underline().to_string(),
            label: |s| s.green().italic().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            body: |s| s.bright_white().to_string(),
            source: |s| s.bright_yellow().dimmed().italic().to_string(),
            error: |s| s.red().to_string(),
            hint: |s| s.cyan().to_string(),
        }
    }

    fn canvas() -> Self {
        Self {
            title: |s| s.blue().bold().underline().to_string(),
            label: |s| s.magenta().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            body: |s| s.black().to_string(),
            source: |s| s.bright_black().italic().to_string(),
            error: |s| s.red().bold().to_string(),
            hint: |s| s.bright_blue().to_string(),
        }
    }
}
