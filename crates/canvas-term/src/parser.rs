// SPDX-License-Identifier: MIT
//
// Escape sequence state machine.
//
// Recognizes the small set of sequences a terminal sends for the keys and
// mouse reports we enable:
//
//   ESC [ A|B|C|D            arrows (CSI)
//   ESC A|B|C|D              arrows without the CSI prefix (optional)
//   ESC O A|B|C|D            arrows in application cursor-key mode (SS3)
//   ESC O P|Q|R|S            F1–F4 (SS3)
//   ESC [ n ~                F5–F12
//   ESC [ < b ; x ; y M|m    SGR mouse press / release
//
// One byte per call, no lookahead. A byte with no transition from the
// current state is a decode error: it is logged, the argument list is
// cleared and the machine drops back to ground. The offending byte is
// consumed, so a garbage stream can never wedge the parser.

use crate::args::ArgList;
use crate::decoder::DecoderConfig;
use crate::error::DecodeError;
use crate::event::{Event, KeyCode};
use crate::geometry::Size;

/// The escape byte (0x1B).
pub const ESC: u8 = 0x1B;

/// Parser state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserState {
    /// Not inside an escape sequence.
    #[default]
    Ground,
    /// After `ESC`.
    Escape,
    /// After `ESC O`.
    Ss3,
    /// After `ESC [`, collecting arguments.
    Csi,
    /// After `ESC [ <`, collecting SGR mouse arguments.
    CsiMouse,
}

impl ParserState {
    const fn name(self) -> &'static str {
        match self {
            Self::Ground => "ground",
            Self::Escape => "escape",
            Self::Ss3 => "ss3",
            Self::Csi => "csi",
            Self::CsiMouse => "csi-mouse",
        }
    }
}

/// What the parser did with a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// A plain byte in ground state; the caller decodes it as UTF-8.
    Text,
    /// The byte was absorbed into a sequence (or discarded by error
    /// recovery). No event yet.
    Pending,
    /// A sequence completed.
    Emit(Event),
}

/// The escape sequence parser.
#[derive(Debug, Clone)]
pub struct EscapeParser {
    state: ParserState,
    args: ArgList,
    config: DecoderConfig,
}

impl EscapeParser {
    #[must_use]
    pub const fn new(config: DecoderConfig) -> Self {
        Self {
            state: ParserState::Ground,
            args: ArgList::new(),
            config,
        }
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> ParserState {
        self.state
    }

    /// Arguments collected for the sequence in progress.
    #[inline]
    #[must_use]
    pub const fn args(&self) -> &ArgList {
        &self.args
    }

    /// Feed one byte. `size` is the geometry used to flip mouse rows.
    pub fn advance(&mut self, byte: u8, size: Size) -> Action {
        let state = self.state;
        match self.step(byte, size) {
            Ok(Some(event)) => {
                tracing::trace!(?event, "escape sequence resolved");
                self.finish();
                Action::Emit(event)
            }
            Ok(None) if self.state == ParserState::Ground => Action::Text,
            Ok(None) => Action::Pending,
            Err(error) => {
                tracing::debug!(%error, state = state.name(), byte, "escape sequence rejected");
                self.finish();
                Action::Pending
            }
        }
    }

    /// Abandon any sequence in progress.
    pub fn reset(&mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        self.state = ParserState::Ground;
        self.args.clear();
    }

    /// One transition. `Ok(None)` with the state left in ground means the
    /// byte is text.
    fn step(&mut self, byte: u8, size: Size) -> Result<Option<Event>, DecodeError> {
        let unexpected = |state: ParserState| DecodeError::UnexpectedByte {
            state: state.name(),
            byte,
        };

        match self.state {
            ParserState::Ground => {
                if byte == ESC {
                    self.state = ParserState::Escape;
                }
                Ok(None)
            }

            ParserState::Escape => match byte {
                b'[' => {
                    self.state = ParserState::Csi;
                    Ok(None)
                }
                b'O' => {
                    self.state = ParserState::Ss3;
                    Ok(None)
                }
                b'A'..=b'D' if self.config.bare_arrow_keys => {
                    Ok(KeyCode::from_arrow_byte(byte).map(Event::Key))
                }
                _ => Err(unexpected(self.state)),
            },

            ParserState::Ss3 => KeyCode::from_ss3_byte(byte)
                .or_else(|| KeyCode::from_arrow_byte(byte))
                .map(|key| Some(Event::Key(key)))
                .ok_or_else(|| unexpected(self.state)),

            ParserState::Csi => match byte {
                b'A'..=b'D' => Ok(KeyCode::from_arrow_byte(byte).map(Event::Key)),
                b'<' => {
                    self.state = ParserState::CsiMouse;
                    Ok(None)
                }
                b'~' => self.tilde_key().map(Some),
                b'0'..=b'9' | b';' => self.args.push(byte).map(|()| None),
                _ => Err(unexpected(self.state)),
            },

            ParserState::CsiMouse => match byte {
                b'M' | b'm' => self.mouse_report(byte == b'M', size).map(Some),
                b'0'..=b'9' | b';' => self.args.push(byte).map(|()| None),
                _ => Err(unexpected(self.state)),
            },
        }
    }

    /// `CSI n ~` → F5–F12.
    fn tilde_key(&self) -> Result<Event, DecodeError> {
        if self.args.count() != 1 {
            return Err(DecodeError::TildeArguments(self.args.count()));
        }
        let n = self.args.value(0).unwrap_or(0);
        KeyCode::from_tilde_number(n)
            .map(Event::Key)
            .ok_or(DecodeError::UnknownTildeNumber(n))
    }

    /// `CSI < b ; x ; y M|m` → mouse press / release in canvas coordinates.
    fn mouse_report(&self, pressed: bool, size: Size) -> Result<Event, DecodeError> {
        if self.args.count() != 3 {
            return Err(DecodeError::MouseArguments(self.args.count()));
        }
        let button = self.args.value(0).unwrap_or(0);
        if button != u32::from(self.config.mouse_button) {
            return Err(DecodeError::MouseButton(button));
        }

        let x = self.args.value(1).unwrap_or(0);
        let y = self.args.value(2).unwrap_or(0);
        // Wire coordinates are 1-based.
        let (Some(col), Some(row)) = (to_index(x), to_index(y)) else {
            return Err(DecodeError::MouseCoordinate { col: x, row: y });
        };
        let row = size.flip_row(row);

        Ok(if pressed {
            Event::MouseDown { col, row }
        } else {
            Event::MouseUp { col, row }
        })
    }
}

impl Default for EscapeParser {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}

/// 1-based wire coordinate → 0-based `u16`. Zero and overflow are rejected.
fn to_index(wire: u32) -> Option<u16> {
    wire.checked_sub(1).and_then(|v| u16::try_from(v).ok())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
