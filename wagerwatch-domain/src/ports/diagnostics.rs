use crate::entities::Diagnostic;
use crate::value_objects::PlayerId;

/// Receives diagnostics from detectors. Detectors never log themselves, so
/// their outcome depends on their inputs only.
pub trait DiagnosticSink {
    fn record(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn record(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Sink that stamps every diagnostic with the player being analyzed.
pub struct PlayerScopedSink<'a> {
    player_id: PlayerId,
    inner: &'a mut dyn DiagnosticSink,
}

impl<'a> PlayerScopedSink<'a> {
    pub fn new(player_id: PlayerId, inner: &'a mut dyn DiagnosticSink) -> Self {
        Self { player_id, inner }
    }
}

impl DiagnosticSink for PlayerScopedSink<'_> {
    fn record(&mut self, diagnostic: Diagnostic) {
        self.inner.record(diagnostic.for_player(self.player_id));
    }
}
