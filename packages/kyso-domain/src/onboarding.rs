use serde::{Deserialize, Serialize};

pub const STEP_COUNT: usize = 5;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OnboardingStep {
	ExploreReports,
	PublishReport,
	ReadAndComment,
	IntegrateWorkflow,
	InviteColleagues,
}
impl OnboardingStep {
	pub const ALL: [Self; STEP_COUNT] = [
		Self::ExploreReports,
		Self::PublishReport,
		Self::ReadAndComment,
		Self::IntegrateWorkflow,
		Self::InviteColleagues,
	];

	/// 1-based position in the checklist.
	pub fn number(self) -> usize {
		match self {
			Self::ExploreReports => 1,
			Self::PublishReport => 2,
			Self::ReadAndComment => 3,
			Self::IntegrateWorkflow => 4,
			Self::InviteColleagues => 5,
		}
	}

	pub fn from_number(number: usize) -> Option<Self> {
		Self::ALL.into_iter().find(|step| step.number() == number)
	}

	pub fn title(self) -> &'static str {
		match self {
			Self::ExploreReports => "Explore reports",
			Self::PublishReport => "Publish your first report",
			Self::ReadAndComment => "Read and comment",
			Self::IntegrateWorkflow => "Integrate with your workflow",
			Self::InviteColleagues => "Invite colleagues",
		}
	}
}

/// Onboarding checklist as stored on the user profile.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct OnboardingProgress {
	#[serde(default)]
	pub step_1: bool,
	#[serde(default)]
	pub step_2: bool,
	#[serde(default)]
	pub step_3: bool,
	#[serde(default)]
	pub step_4: bool,
	#[serde(default)]
	pub step_5: bool,
	#[serde(default)]
	pub finish_and_remove: bool,
}
impl OnboardingProgress {
	pub fn is_done(&self, step: OnboardingStep) -> bool {
		match step {
			OnboardingStep::ExploreReports => self.step_1,
			OnboardingStep::PublishReport => self.step_2,
			OnboardingStep::ReadAndComment => self.step_3,
			OnboardingStep::IntegrateWorkflow => self.step_4,
			OnboardingStep::InviteColleagues => self.step_5,
		}
	}

	pub fn completed_steps(&self) -> usize {
		OnboardingStep::ALL.into_iter().filter(|step| self.is_done(*step)).count()
	}

	pub fn percent(&self) -> u8 {
		if self.finish_and_remove {
			return 100;
		}

		(self.completed_steps() * 100 / STEP_COUNT) as u8
	}

	/// Returns true when the step was not already done.
	pub fn mark_done(&mut self, step: OnboardingStep) -> bool {
		let slot = match step {
			OnboardingStep::ExploreReports => &mut self.step_1,
			OnboardingStep::PublishReport => &mut self.step_2,
			OnboardingStep::ReadAndComment => &mut self.step_3,
			OnboardingStep::IntegrateWorkflow => &mut self.step_4,
			OnboardingStep::InviteColleagues => &mut self.step_5,
		};
		let changed = !*slot;

		*slot = true;

		changed
	}

	pub fn finish_and_remove(&mut self) {
		self.finish_and_remove = true;
	}

	pub fn is_finished(&self) -> bool {
		self.finish_and_remove || self.completed_steps() == STEP_COUNT
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn percent_tracks_completed_steps() {
		let mut progress = OnboardingProgress::default();

		assert_eq!(progress.percent(), 0);

		assert!(progress.mark_done(OnboardingStep::PublishReport));
		assert!(!progress.mark_done(OnboardingStep::PublishReport));
		assert_eq!(progress.percent(), 20);

		for step in OnboardingStep::ALL {
			progress.mark_done(step);
		}

		assert_eq!(progress.percent(), 100);
		assert!(progress.is_finished());
	}

	#[test]
	fn finish_and_remove_alone_is_complete() {
		let progress = OnboardingProgress { finish_and_remove: true, ..Default::default() };

		assert_eq!(progress.percent(), 100);
	}

	#[test]
	fn all_steps_complete_regardless_of_remove_flag() {
		let progress = OnboardingProgress {
			step_1: true,
			step_2: true,
			step_3: true,
			step_4: true,
			step_5: true,
			finish_and_remove: false,
		};

		assert_eq!(progress.percent(), 100);
	}

	#[test]
	fn steps_round_trip_through_numbers() {
		assert_eq!(OnboardingStep::from_number(3), Some(OnboardingStep::ReadAndComment));
		assert_eq!(OnboardingStep::from_number(0), None);
		assert_eq!(OnboardingStep::from_number(6), None);
	}
}
