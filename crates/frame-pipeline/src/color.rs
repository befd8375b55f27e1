//! 채널 색상 -- chalk 스타일 색상 이름을 콘솔/HTML 표현으로 변환합니다.
//!
//! 전경색은 `red`, `blueBright`, `gray` 형태, 배경색은 `bgRed`, `bgBlueBright`
//! 형태의 이름을 사용합니다.

use std::str::FromStr;

/// 16색 팔레트의 명명된 색상
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl NamedColor {
    /// 배경색 이름(`bgRed` 등)을 파싱합니다.
    pub fn parse_background(name: &str) -> Result<Self, String> {
        let stripped = name
            .strip_prefix("bg")
            .ok_or_else(|| format!("background color '{name}' must start with 'bg'"))?;
        let mut chars = stripped.chars();
        let base = match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect::<String>(),
            None => return Err(format!("unknown background color '{name}'")),
        };
        base.parse()
            .map_err(|_| format!("unknown background color '{name}'"))
    }

    /// `colored` 크레이트의 색상으로 변환합니다.
    pub fn to_colored(self) -> colored::Color {
        use colored::Color;
        match self {
            Self::Black => Color::Black,
            Self::Red => Color::Red,
            Self::Green => Color::Green,
            Self::Yellow => Color::Yellow,
            Self::Blue => Color::Blue,
            Self::Magenta => Color::Magenta,
            Self::Cyan => Color::Cyan,
            Self::White => Color::White,
            Self::BrightBlack => Color::BrightBlack,
            Self::BrightRed => Color::BrightRed,
            Self::BrightGreen => Color::BrightGreen,
            Self::BrightYellow => Color::BrightYellow,
            Self::BrightBlue => Color::BrightBlue,
            Self::BrightMagenta => Color::BrightMagenta,
            Self::BrightCyan => Color::BrightCyan,
            Self::BrightWhite => Color::BrightWhite,
        }
    }

    /// HTML 스타일시트용 CSS 색상 값
    pub fn css(self) -> &'static str {
        match self {
            Self::Black => "#000000",
            Self::Red => "#cd0000",
            Self::Green => "#00cd00",
            Self::Yellow => "#cdcd00",
            Self::Blue => "#0000ee",
            Self::Magenta => "#cd00cd",
            Self::Cyan => "#00cdcd",
            Self::White => "#e5e5e5",
            Self::BrightBlack => "#7f7f7f",
            Self::BrightRed => "#ff0000",
            Self::BrightGreen => "#00ff00",
            Self::BrightYellow => "#ffff00",
            Self::BrightBlue => "#5c5cff",
            Self::BrightMagenta => "#ff00ff",
            Self::BrightCyan => "#00ffff",
            Self::BrightWhite => "#ffffff",
        }
    }
}

impl FromStr for NamedColor {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let color = match name {
            "black" => Self::Black,
            "red" => Self::Red,
            "green" => Self::Green,
            "yellow" => Self::Yellow,
            "blue" => Self::Blue,
            "magenta" => Self::Magenta,
            "cyan" => Self::Cyan,
            "white" => Self::White,
            "blackBright" | "gray" | "grey" => Self::BrightBlack,
            "redBright" => Self::BrightRed,
            "greenBright" => Self::BrightGreen,
            "yellowBright" => Self::BrightYellow,
            "blueBright" => Self::BrightBlue,
            "magentaBright" => Self::BrightMagenta,
            "cyanBright" => Self::BrightCyan,
            "whiteBright" => Self::BrightWhite,
            _ => return Err(format!("unknown color '{name}'")),
        };
        Ok(color)
    }
}
