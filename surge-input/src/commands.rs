//! Command definitions for SURGE

/// Direction for stepping through the visible speeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Up,
    Down,
}

/// Commands that can be dispatched from input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // Playback
    TogglePlay,
    SkipBack,

    // Speed selection
    SelectSpeed(f64),
    SelectVisible(usize), // 0-based index on the speed bar
    StepSpeed(StepDirection),

    // Speed options
    AddSpeed(f64),
    RemoveSpeed(f64),
    ToggleSpeed(f64),

    // Media element
    Eject,
    Load,

    // UI
    ToggleHelp,
    SetTheme(String),

    // Mode changes
    EnterCommandMode,
    EnterNormalMode,

    // Application
    Quit,
    Cancel,

    // Command mode
    ExecuteCommand(String),
}

/// Parse a command line entered after `:`
pub fn parse_command_line(input: &str) -> Option<Command> {
    let input = input.trim();

    match input {
        "q" | "quit" => return Some(Command::Quit),
        "help" => return Some(Command::ToggleHelp),
        "eject" => return Some(Command::Eject),
        "load" => return Some(Command::Load),
        _ => {}
    }

    let (verb, arg) = input.split_once(' ')?;
    let arg = arg.trim();

    if verb == "theme" {
        return (!arg.is_empty()).then(|| Command::SetTheme(arg.to_string()));
    }

    let speed = parse_speed(arg)?;
    match verb {
        "speed" => Some(Command::SelectSpeed(speed)),
        "add" => Some(Command::AddSpeed(speed)),
        "remove" | "rm" => Some(Command::RemoveSpeed(speed)),
        "toggle" => Some(Command::ToggleSpeed(speed)),
        _ => None,
    }
}

/// Accepts `1.5` or `1.5x`
fn parse_speed(arg: &str) -> Option<f64> {
    let arg = arg.strip_suffix('x').unwrap_or(arg);
    arg.parse::<f64>()
        .ok()
        .filter(|speed| speed.is_finite() && *speed > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_command_line("q"), Some(Command::Quit));
        assert_eq!(parse_command_line(" quit "), Some(Command::Quit));
        assert_eq!(parse_command_line("eject"), Some(Command::Eject));
        assert_eq!(parse_command_line("load"), Some(Command::Load));
    }

    #[test]
    fn test_speed_commands() {
        assert_eq!(parse_command_line("speed 1.5"), Some(Command::SelectSpeed(1.5)));
        assert_eq!(parse_command_line("speed 2x"), Some(Command::SelectSpeed(2.0)));
        assert_eq!(parse_command_line("add 1.35"), Some(Command::AddSpeed(1.35)));
        assert_eq!(parse_command_line("rm 1.35"), Some(Command::RemoveSpeed(1.35)));
        assert_eq!(parse_command_line("toggle 4"), Some(Command::ToggleSpeed(4.0)));
    }

    #[test]
    fn test_theme() {
        assert_eq!(
            parse_command_line("theme tape"),
            Some(Command::SetTheme("tape".to_string()))
        );
        assert_eq!(parse_command_line("theme "), None);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(parse_command_line("speed fast"), None);
        assert_eq!(parse_command_line("speed -1"), None);
        assert_eq!(parse_command_line("speed"), None);
        assert_eq!(parse_command_line("warp 2"), None);
        assert_eq!(parse_command_line(""), None);
    }
}
