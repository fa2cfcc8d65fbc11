//! Channel identity.

use core::fmt;

/// Number of oscillator channels.
pub const CHANNEL_COUNT: usize = 4;

/// One of the four fixed oscillator channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ChannelId {
    SquareA = 0,
    SquareB = 1,
    Triangle = 2,
    Noise = 3,
}

/// A channel number that names no channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("channel {0} does not exist")]
pub struct InvalidChannel(pub u8);

impl ChannelId {
    pub const ALL: [ChannelId; CHANNEL_COUNT] =
        [ChannelId::SquareA, ChannelId::SquareB, ChannelId::Triangle, ChannelId::Noise];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Square A, Square B and Noise carry an ADSR envelope.
    pub const fn has_envelope(self) -> bool {
        !matches!(self, ChannelId::Triangle)
    }

    /// Both squares step their vibrato. The triangle only stores the on/off flag.
    pub const fn has_vibrato(self) -> bool {
        matches!(self, ChannelId::SquareA | ChannelId::SquareB)
    }

    pub const fn has_duty(self) -> bool {
        !matches!(self, ChannelId::Noise)
    }
}

impl TryFrom<u8> for ChannelId {
    type Error = InvalidChannel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ChannelId::SquareA),
            1 => Ok(ChannelId::SquareB),
            2 => Ok(ChannelId::Triangle),
            3 => Ok(ChannelId::Noise),
            other => Err(InvalidChannel(other)),
        }
    }
}

impl From<ChannelId> for u8 {
    fn from(id: ChannelId) -> u8 {
        id as u8
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelId::SquareA => "square A",
            ChannelId::SquareB => "square B",
            ChannelId::Triangle => "triangle",
            ChannelId::Noise => "noise",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_u8() {
        for id in ChannelId::ALL {
            assert_eq!(ChannelId::try_from(u8::from(id)), Ok(id));
        }
    }

    #[test]
    fn unknown_number_is_rejected() {
        assert_eq!(ChannelId::try_from(4), Err(InvalidChannel(4)));
        assert_eq!(ChannelId::try_from(255), Err(InvalidChannel(255)));
    }

    #[test]
    fn capabilities() {
        assert!(ChannelId::SquareA.has_envelope());
        assert!(ChannelId::Noise.has_envelope());
        assert!(!ChannelId::Triangle.has_envelope());
        assert!(ChannelId::SquareB.has_vibrato());
        assert!(!ChannelId::Triangle.has_vibrato());
        assert!(ChannelId::Triangle.has_duty());
        assert!(!ChannelId::Noise.has_duty());
    }
}
