use serde::{Deserialize, Serialize};

/// Tags one render request. Tokens only ever grow within a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderToken(pub u64);

/// Issues render tokens and recognises the latest one.
///
/// A completion is applied only when it carries the most recently issued
/// token, so a slow render for an earlier selection can never overwrite a
/// newer one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSequence {
    latest: RenderToken,
}

impl RenderSequence {
    pub fn issue(&mut self) -> RenderToken {
        self.latest = RenderToken(self.latest.0 + 1);
        self.latest
    }

    pub fn is_latest(&self, token: RenderToken) -> bool {
        token == self.latest && token.0 > 0
    }

    pub fn latest(&self) -> RenderToken {
        self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_last_issued_token_is_current() {
        let mut sequence = RenderSequence::default();
        assert!(!sequence.is_latest(RenderToken::default()));

        let first = sequence.issue();
        let second = sequence.issue();
        assert!(second > first);
        assert!(!sequence.is_latest(first));
        assert!(sequence.is_latest(second));
    }
}
