use super::{PathCommand, PathData, PathDataIssue, PathSegment};
use log::debug;

impl PathData {
    /// Parse SVG path data text.
    ///
    /// Parsing never fails as a whole: unsupported commands, stray characters and commands with
    /// missing arguments are skipped and reported in the returned issue list.
    ///
    /// # Examples
    ///
    /// ```
    /// # use path_contours::path::*;
    /// let (data, issues) = PathData::parse("M0 0 10 0l0,10z");
    /// assert!(issues.is_empty());
    /// assert_eq!(data.len(), 4);
    /// assert_eq!(data.commands[1].letter(), 'L');
    /// assert_eq!(data.commands[2].letter(), 'l');
    /// ```
    pub fn parse(text: &str) -> (PathData, Vec<PathDataIssue>) {
        let mut parser = Parser {
            bytes: text.as_bytes(),
            pos: 0,
            data: PathData::new(),
            issues: Vec::new(),
        };
        parser.run();
        if !parser.issues.is_empty() {
            debug!(
                "parsed path data with {} issue(s): {:?}",
                parser.issues.len(),
                parser.issues
            );
        }
        (parser.data, parser.issues)
    }
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    data: PathData,
    issues: Vec<PathDataIssue>,
}

#[inline]
fn is_separator(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0C' | b',')
}

#[inline]
fn is_number_start(b: u8) -> bool {
    b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+')
}

#[inline]
fn arg_count(letter: u8) -> Option<usize> {
    match letter.to_ascii_uppercase() {
        b'M' | b'L' | b'T' => Some(2),
        b'H' | b'V' => Some(1),
        b'C' => Some(6),
        b'S' | b'Q' => Some(4),
        b'A' => Some(7),
        b'Z' => Some(0),
        _ => None,
    }
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_separators(&mut self) {
        while let Some(b) = self.peek() {
            if !is_separator(b) {
                break;
            }
            self.pos += 1;
        }
    }

    fn run(&mut self) {
        let mut current: Option<(u8, usize)> = None;
        loop {
            self.skip_separators();
            let Some(b) = self.peek() else {
                break;
            };
            let offset = self.pos;

            if b.is_ascii_alphabetic() {
                self.pos += 1;
                match arg_count(b) {
                    Some(0) => {
                        self.data.push(PathCommand {
                            relative: b.is_ascii_lowercase(),
                            segment: PathSegment::ClosePath,
                        });
                        current = None;
                    }
                    Some(_) => {
                        current = Some((b, offset));
                        if !self.read_command(b, offset) {
                            current = None;
                        }
                    }
                    None => {
                        self.issues.push(PathDataIssue::UnsupportedCommand {
                            letter: b as char,
                            offset,
                        });
                        current = None;
                        self.skip_to_next_command();
                    }
                }
                continue;
            }

            if is_number_start(b) {
                match current {
                    Some((letter, _)) => {
                        // implicit repeat, extra pairs after a move are line commands
                        let repeat = match letter {
                            b'M' => b'L',
                            b'm' => b'l',
                            other => other,
                        };
                        let start = self.pos;
                        if !self.read_command(repeat, offset) {
                            current = None;
                            if self.pos == start {
                                self.pos += 1;
                            }
                        }
                    }
                    None => {
                        self.issues
                            .push(PathDataIssue::NumberWithoutCommand { offset });
                        self.skip_to_next_command();
                    }
                }
                continue;
            }

            let ch = self.next_char();
            self.issues
                .push(PathDataIssue::UnexpectedCharacter { ch, offset });
        }
    }

    /// Consume the full character at the current position (for error reporting).
    fn next_char(&mut self) -> char {
        let rest = &self.bytes[self.pos..];
        let ch = std::str::from_utf8(rest)
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        self.pos += ch.len_utf8().max(1);
        ch
    }

    fn skip_to_next_command(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_alphabetic() && arg_count(b).is_some() {
                break;
            }
            self.pos += 1;
        }
    }

    /// Read the arguments of one command. Returns false (and records an issue) when arguments
    /// are missing.
    fn read_command(&mut self, letter: u8, offset: usize) -> bool {
        let relative = letter.is_ascii_lowercase();
        let segment = match letter.to_ascii_uppercase() {
            b'A' => self.read_arc(),
            upper => {
                let mut args = [0.0; 6];
                let count = arg_count(upper).unwrap_or(0);
                let mut ok = true;
                for arg in args.iter_mut().take(count) {
                    match self.read_number() {
                        Some(v) => *arg = v,
                        None => {
                            ok = false;
                            break;
                        }
                    }
                }
                if ok {
                    Some(segment_from_args(upper, &args))
                } else {
                    None
                }
            }
        };

        match segment {
            Some(segment) if !segment.is_finite() => {
                debug!("skipping '{}' at byte {offset}, number out of range", letter as char);
                self.issues.push(PathDataIssue::NonFiniteNumber {
                    letter: letter as char,
                    offset,
                });
                true
            }
            Some(segment) => {
                self.data.push(PathCommand { relative, segment });
                true
            }
            None => {
                self.issues.push(PathDataIssue::MissingArguments {
                    letter: letter as char,
                    offset,
                });
                false
            }
        }
    }

    fn read_arc(&mut self) -> Option<PathSegment> {
        let rx = self.read_number()?;
        let ry = self.read_number()?;
        let x_axis_rotation = self.read_number()?;
        let large_arc = self.read_flag()?;
        let sweep = self.read_flag()?;
        let x = self.read_number()?;
        let y = self.read_number()?;
        Some(PathSegment::EllipticalArc {
            rx,
            ry,
            x_axis_rotation,
            large_arc,
            sweep,
            x,
            y,
        })
    }

    /// Arc flags are single characters and may be written without separators (`a1 1 0 00 1 1`).
    fn read_flag(&mut self) -> Option<bool> {
        self.skip_separators();
        let flag = match self.peek()? {
            b'0' => false,
            b'1' => true,
            _ => return None,
        };
        self.pos += 1;
        Some(flag)
    }

    /// Read one number. Nothing is consumed (apart from separators) when no number is present.
    fn read_number(&mut self) -> Option<f64> {
        self.skip_separators();
        let bytes = self.bytes;
        let start = self.pos;
        let mut i = start;

        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }

        let int_start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        let mut digit_count = i - int_start;

        if bytes.get(i) == Some(&b'.') {
            i += 1;
            let frac_start = i;
            while bytes.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
            digit_count += i - frac_start;
        }

        if digit_count == 0 {
            return None;
        }

        if matches!(bytes.get(i), Some(b'e' | b'E')) {
            let mut j = i + 1;
            if matches!(bytes.get(j), Some(b'+' | b'-')) {
                j += 1;
            }
            if bytes.get(j).is_some_and(u8::is_ascii_digit) {
                while bytes.get(j).is_some_and(u8::is_ascii_digit) {
                    j += 1;
                }
                i = j;
            }
        }

        let text = std::str::from_utf8(&bytes[start..i]).ok()?;
        let value = text.parse::<f64>().ok()?;
        self.pos = i;
        Some(value)
    }
}

fn segment_from_args(upper: u8, a: &[f64; 6]) -> PathSegment {
    match upper {
        b'M' => PathSegment::MoveTo { x: a[0], y: a[1] },
        b'L' => PathSegment::LineTo { x: a[0], y: a[1] },
        b'H' => PathSegment::HorizontalLineTo { x: a[0] },
        b'V' => PathSegment::VerticalLineTo { y: a[0] },
        b'C' => PathSegment::CurveTo {
            x1: a[0],
            y1: a[1],
            x2: a[2],
            y2: a[3],
            x: a[4],
            y: a[5],
        },
        b'S' => PathSegment::SmoothCurveTo {
            x2: a[0],
            y2: a[1],
            x: a[2],
            y: a[3],
        },
        b'Q' => PathSegment::Quadratic {
            x1: a[0],
            y1: a[1],
            x: a[2],
            y: a[3],
        },
        b'T' => PathSegment::SmoothQuadratic { x: a[0], y: a[1] },
        _ => unreachable!("segment_from_args called with letter {}", upper as char),
    }
}
