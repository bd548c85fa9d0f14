use crate::entities::{DetectionParams, DetectionReport, PlayerBatch, PlayerFailure, PlayerTimeline};
use crate::ports::{DiagnosticSink, PlayerScopedSink};
use crate::services::{SequenceDetector, StreakDetector};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerVerdict {
    pub sequence: bool,
    pub streak: bool,
}

/// Runs both detectors over every player and collects the flagged ids.
#[derive(Debug, Clone, Default)]
pub struct PlayerAnalyzer {
    sequence: SequenceDetector,
    streak: StreakDetector,
}

impl PlayerAnalyzer {
    pub fn new(params: &DetectionParams) -> Self {
        Self {
            sequence: SequenceDetector::from_params(params),
            streak: StreakDetector::from_params(params),
        }
    }

    pub fn analyze_player(
        &self,
        timeline: &PlayerTimeline,
        sink: &mut dyn DiagnosticSink,
    ) -> PlayerVerdict {
        PlayerVerdict {
            sequence: self.sequence.has_deposit_bet_withdrawal_sequence(timeline, sink),
            streak: self.streak.has_win_streak(timeline.bets(), sink),
        }
    }

    /// A batch that fails timeline validation is listed in `failures` and
    /// the remaining players are still analyzed.
    pub fn analyze<I>(&self, batches: I) -> DetectionReport
    where
        I: IntoIterator<Item = PlayerBatch>,
    {
        let mut report = DetectionReport::default();
        for batch in batches {
            let player_id = batch.player_id;
            let timeline = match batch.into_timeline() {
                Ok(timeline) => timeline,
                Err(err) => {
                    report.failures.push(PlayerFailure {
                        player_id,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            let mut sink = PlayerScopedSink::new(player_id, &mut report.diagnostics);
            let verdict = self.analyze_player(&timeline, &mut sink);
            report.players_analyzed += 1;
            if verdict.sequence {
                report.sequence_flagged.insert(player_id);
            }
            if verdict.streak {
                report.streak_flagged.insert(player_id);
            }
        }
        report
    }
}
