/// Tiered OTE bonus payout. `goal_progress` is a percentage, not a fraction;
/// the 70/100/120 boundaries belong to the upper tier.
pub fn calculate_ote_bonus(goal_progress: f64, ote_bonus: f64) -> f64 {
	if !goal_progress.is_finite() {
		return 0.0;
	}

	if goal_progress >= 120.0 {
		ote_bonus * 1.2
	} else if goal_progress >= 100.0 {
		ote_bonus
	} else if goal_progress >= 70.0 {
		ote_bonus * 0.7
	} else {
		0.0
	}
}

/// Attainment as a percentage. A missing or zero target yields 0 rather than
/// dividing by zero; values above 100 are not clamped.
pub fn goal_progress(current: f64, target: f64) -> f64 {
	if target > 0.0 && current.is_finite() { current / target * 100.0 } else { 0.0 }
}
