//! The private OSC 99999 payload grammar (§4.3, §6).
//!
//! ```text
//! 99999 ; cmd [; arg]*
//! cmd ∈ { A, R, U, D, list, plugins, stop, start, kill }
//! ```
//!
//! The terminal state machine strips the `99999;` vendor prefix before
//! handing the remainder to [`parse`] — this module only understands the
//! payload *after* that prefix.

use crate::record::{PositionMode, SizeSpec};

/// Vendor id for the private extension OSC command (§4.3).
pub const VENDOR_ID: u32 = 99999;

/// Base-94-encode `data`: each input byte `b` maps to two output bytes
/// `(b/94 + '!', b%94 + '!')`. The empty payload is the empty string (I5).
pub fn base94_encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 2);
    for &b in data {
        let hi = b / 94 + b'!';
        let lo = b % 94 + b'!';
        out.push(hi as char);
        out.push(lo as char);
    }
    out
}

/// Inverse of [`base94_encode`]. Malformed (odd-length, out-of-range) input
/// yields an empty `Vec` rather than an error — the OSC-parsing policy (§7)
/// is to silently ignore malformed sequences.
pub fn base94_decode(encoded: &str) -> Vec<u8> {
    let bytes = encoded.as_bytes();
    if bytes.len() % 2 != 0 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(bytes.len() / 2);
    for pair in bytes.chunks_exact(2) {
        let (hi, lo) = (pair[0], pair[1]);
        if !(b'!'..=b'~').contains(&hi) || !(b'!'..=b'~').contains(&lo) {
            return Vec::new();
        }
        let b = (hi - b'!') * 94 + (lo - b'!');
        out.push(b);
    }
    out
}

/// A single "stop"/"start"/"kill" target selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Id(String),
    Plugin(String),
    All,
}

/// A parsed OSC 99999 command.
#[derive(Debug, Clone, PartialEq)]
pub enum OscCommand {
    Create {
        plugin: String,
        mode: PositionMode,
        x: i32,
        y: i32,
        size: SizeSpec,
        payload: Vec<u8>,
    },
    Update {
        id: String,
        payload: Vec<u8>,
    },
    Destroy {
        id: String,
    },
    List {
        all: bool,
    },
    Plugins,
    Stop(Selector),
    Start(Selector),
    Kill(Selector),
}

/// Parse the payload following the `99999;` prefix. Returns `None` for any
/// syntactically-malformed command — callers should silently drop it (§7).
pub fn parse(payload: &str) -> Option<OscCommand> {
    let parts: Vec<&str> = payload.split(';').collect();
    if parts.is_empty() {
        return None;
    }

    match parts[0] {
        "list" => {
            let all = parts.get(1).map(|s| *s == "--all").unwrap_or(false);
            Some(OscCommand::List { all })
        }
        "plugins" => Some(OscCommand::Plugins),
        "stop" => parse_selector(&parts[1..]).map(OscCommand::Stop),
        "start" => parse_selector(&parts[1..]).map(OscCommand::Start),
        "kill" => parse_selector(&parts[1..]).map(OscCommand::Kill),
        plugin if !plugin.is_empty() && is_identifier(plugin) => {
            parse_plugin_command(plugin, &parts[1..])
        }
        _ => None,
    }
}

fn parse_selector(args: &[&str]) -> Option<Selector> {
    let arg = args.first()?;
    if let Some(id) = arg.strip_prefix("--id=") {
        Some(Selector::Id(id.to_string()))
    } else if let Some(name) = arg.strip_prefix("--plugin=") {
        Some(Selector::Plugin(name.to_string()))
    } else {
        Some(Selector::All)
    }
}

fn parse_plugin_command(plugin: &str, args: &[&str]) -> Option<OscCommand> {
    match args.first()? {
        &"A" | &"R" => {
            let mode = if args[0] == "A" {
                PositionMode::Absolute
            } else {
                PositionMode::Relative
            };
            let x: i32 = args.get(1)?.parse().ok()?;
            let y: i32 = args.get(2)?.parse().ok()?;
            let w: i32 = args.get(3)?.parse().ok()?;
            let h: i32 = args.get(4)?.parse().ok()?;
            let encoded = args.get(5).copied().unwrap_or("");
            Some(OscCommand::Create {
                plugin: plugin.to_string(),
                mode,
                x,
                y,
                size: SizeSpec { w, h },
                payload: base94_decode(encoded),
            })
        }
        &"U" => {
            let id = args.get(1)?.to_string();
            if !is_hash_id(&id) {
                return None;
            }
            let encoded = args.get(2).copied().unwrap_or("");
            Some(OscCommand::Update {
                id,
                payload: base94_decode(encoded),
            })
        }
        &"D" => {
            let id = args.get(1)?.to_string();
            is_hash_id(&id).then_some(OscCommand::Destroy { id })
        }
        _ => None,
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn is_hash_id(s: &str) -> bool {
    s.len() == 8 && s.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base94_round_trips_every_byte() {
        let data: Vec<u8> = (0u8..=255).collect();
        let encoded = base94_encode(&data);
        assert_eq!(encoded.len(), 2 * 256);
        assert_eq!(base94_decode(&encoded), data);
    }

    #[test]
    fn base94_empty_round_trips() {
        assert_eq!(base94_encode(&[]), "");
        assert_eq!(base94_decode(""), Vec::<u8>::new());
    }

    #[test]
    fn parses_absolute_create() {
        let payload = format!("shader;A;0;0;10;5;{}", base94_encode(b"HELLO"));
        let cmd = parse(&payload).unwrap();
        match cmd {
            OscCommand::Create {
                plugin,
                mode,
                x,
                y,
                size,
                payload,
            } => {
                assert_eq!(plugin, "shader");
                assert_eq!(mode, PositionMode::Absolute);
                assert_eq!((x, y, size.w, size.h), (0, 0, 10, 5));
                assert_eq!(payload, b"HELLO");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn parses_relative_create_with_deltas() {
        let payload = "shader;R;6;3;6;3;";
        let cmd = parse(payload).unwrap();
        assert!(matches!(
            cmd,
            OscCommand::Create {
                mode: PositionMode::Relative,
                x: 6,
                y: 3,
                ..
            }
        ));
    }

    #[test]
    fn parses_destroy() {
        let cmd = parse("shader;D;abcdEFGH").unwrap();
        assert_eq!(
            cmd,
            OscCommand::Destroy {
                id: "abcdEFGH".into()
            }
        );
    }

    #[test]
    fn parses_list_and_plugins() {
        assert_eq!(parse("list").unwrap(), OscCommand::List { all: false });
        assert_eq!(
            parse("list;--all").unwrap(),
            OscCommand::List { all: true }
        );
        assert_eq!(parse("plugins").unwrap(), OscCommand::Plugins);
    }

    #[test]
    fn parses_stop_start_kill_selectors() {
        assert_eq!(
            parse("stop;--id=abcdEFGH").unwrap(),
            OscCommand::Stop(Selector::Id("abcdEFGH".into()))
        );
        assert_eq!(
            parse("start;--plugin=shader").unwrap(),
            OscCommand::Start(Selector::Plugin("shader".into()))
        );
        assert_eq!(parse("kill").unwrap(), OscCommand::Kill(Selector::All));
    }

    #[test]
    fn malformed_commands_are_rejected() {
        assert!(parse("shader;A;notanumber;0;1;1;").is_none());
        assert!(parse("shader;D;short").is_none());
        assert!(parse("").is_none());
    }
}
