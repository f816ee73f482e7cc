use std::fmt;

use serde::Serialize;

use crate::error::PackingError;

/// One physical controller output: a host and a 1-based channel number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Socket {
    pub host: String,
    pub channel: u32,
}

impl Socket {
    #[must_use]
    pub fn new(host: impl Into<String>, channel: u32) -> Self {
        Self {
            host: host.into(),
            channel,
        }
    }

    /// Parses `<host>#<channel>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the `#` separator or the channel number is missing,
    /// or the channel is 0.
    pub fn parse(text: &str) -> Result<Self, PackingError> {
        let (host, channel) = text
            .split_once('#')
            .ok_or_else(|| PackingError::MalformedOutputSpec(text.into()))?;
        let channel = channel
            .parse()
            .map_err(|_| PackingError::MalformedOutputSpec(text.into()))?;
        if host.is_empty() || channel == 0 {
            return Err(PackingError::MalformedOutputSpec(text.into()));
        }
        Ok(Self::new(host, channel))
    }
}

impl fmt::Display for Socket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.host, self.channel)
    }
}

/// A socket together with the number of pixels it can drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Output {
    #[serde(flatten)]
    pub socket: Socket,
    pub capacity: usize,
}

impl Output {
    #[must_use]
    pub fn new(socket: Socket, capacity: usize) -> Self {
        Self { socket, capacity }
    }
}

/// A contiguous run of channels on one host, written `<host>#<min>[-<max>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputGroup {
    pub host: String,
    pub min_channel: u32,
    /// `None` means "up to the controller's last channel".
    pub max_channel: Option<u32>,
}

/// A panel's `/`-separated list of output groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSpec {
    pub groups: Vec<OutputGroup>,
}

impl OutputSpec {
    /// Parses a `/`-separated list of `<host>#<min>[-<max>]` groups.
    ///
    /// # Errors
    ///
    /// Returns [`PackingError::MalformedOutputSpec`] on a group without `#`,
    /// a non-numeric or zero channel, or `max < min`.
    pub fn parse(text: &str) -> Result<Self, PackingError> {
        let malformed = || PackingError::MalformedOutputSpec(text.into());
        let mut groups = Vec::new();
        for entry in text.split('/') {
            let (host, channels) = entry.split_once('#').ok_or_else(malformed)?;
            if host.is_empty() {
                return Err(malformed());
            }
            let (min, max) = match channels.split_once('-') {
                Some((min, max)) => (min, Some(max)),
                None => (channels, None),
            };
            let min_channel: u32 = min.parse().map_err(|_| malformed())?;
            let max_channel = max
                .map(str::parse::<u32>)
                .transpose()
                .map_err(|_| malformed())?;
            if min_channel == 0 || max_channel.is_some_and(|max| max < min_channel) {
                return Err(malformed());
            }
            groups.push(OutputGroup {
                host: host.into(),
                min_channel,
                max_channel,
            });
        }
        Ok(Self { groups })
    }

    /// Expands the groups into at most `count` sockets, in order.
    ///
    /// Groups without an explicit maximum run up to `default_max_channel`.
    /// Fewer than `count` sockets are returned if the groups run out.
    #[must_use]
    pub fn sockets(&self, count: usize, default_max_channel: u32) -> Vec<Socket> {
        self.groups
            .iter()
            .flat_map(|group| {
                let max = group.max_channel.unwrap_or(default_max_channel);
                (group.min_channel..=max).map(move |ch| Socket::new(group.host.clone(), ch))
            })
            .take(count)
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn socket_parse() {
        let socket = Socket::parse("10.7.1.1#3").unwrap();
        assert_eq!(socket.host, "10.7.1.1");
        assert_eq!(socket.channel, 3);
        assert!(Socket::parse("10.7.1.1").is_err());
        assert!(Socket::parse("10.7.1.1#x").is_err());
        assert!(Socket::parse("10.7.1.1#0").is_err());
    }

    #[test]
    fn groups_expand_in_order_with_default_max() {
        let spec = OutputSpec::parse("10.7.4.1#3/10.7.5.1#1-2").unwrap();
        let sockets = spec.sockets(10, 4);
        let names: Vec<String> = sockets.iter().map(ToString::to_string).collect();
        assert_eq!(
            names,
            ["10.7.4.1 #3", "10.7.4.1 #4", "10.7.5.1 #1", "10.7.5.1 #2"]
        );
    }

    #[test]
    fn expansion_stops_at_requested_count() {
        let spec = OutputSpec::parse("host#1-8").unwrap();
        assert_eq!(spec.sockets(3, 4).len(), 3);
    }

    #[test]
    fn channels_are_one_based() {
        assert!(OutputSpec::parse("host#0").is_err());
        assert!(OutputSpec::parse("host#0-2").is_err());
        assert!(OutputSpec::parse("a#1/b#0").is_err());
        assert_eq!(OutputSpec::parse("host#1-1").unwrap().sockets(5, 4).len(), 1);
    }

    #[test]
    fn rejects_inverted_range() {
        assert!(OutputSpec::parse("host#4-2").is_err());
        assert!(OutputSpec::parse("host").is_err());
    }
}
