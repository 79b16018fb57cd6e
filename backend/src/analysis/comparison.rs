//! Two-arm cost-effectiveness comparison
//!
//! Reports each arm's outcome means with t intervals, and the incremental
//! (treatment minus reference) cost, utility and stroke time with Welch
//! intervals. These are plain numbers; formatting is left to the caller.

use serde::{Deserialize, Serialize};

use crate::cohort::{Metric, SimulatedCohort};
use crate::models::TherapyArm;
use crate::stats::{ConfidenceInterval, DifferenceStatIndp, StatsError, SummaryStat};

/// Point estimate with its standard error and interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub name: String,
    pub mean: f64,
    pub std_err: f64,
    pub ci: ConfidenceInterval,
}

impl Estimate {
    fn from_summary(stat: &SummaryStat, alpha: f64) -> Result<Self, StatsError> {
        Ok(Self {
            name: stat.name().to_string(),
            mean: stat.mean(),
            std_err: stat.std_err(),
            ci: stat.t_ci(alpha)?,
        })
    }

    fn from_difference(stat: &DifferenceStatIndp, alpha: f64) -> Result<Self, StatsError> {
        Ok(Self {
            name: stat.name().to_string(),
            mean: stat.mean(),
            std_err: stat.std_err(),
            ci: stat.t_ci(alpha)?,
        })
    }
}

/// Outcome summary of one arm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmSummary {
    pub cohort_id: u64,
    pub therapy: TherapyArm,
    pub population_size: usize,
    pub censored: usize,
    pub survival_time: Estimate,
    pub stroke_time: Estimate,
    pub discounted_cost: Estimate,
    pub discounted_utility: Estimate,
}

impl ArmSummary {
    pub fn from_cohort(cohort: &SimulatedCohort, alpha: f64) -> Result<Self, StatsError> {
        let estimate = |metric: Metric| -> Result<Estimate, StatsError> {
            let stat = SummaryStat::from_sample(&cohort.outcome(metric))?;
            Estimate::from_summary(&stat, alpha)
        };

        Ok(Self {
            cohort_id: cohort.cohort_id(),
            therapy: cohort.therapy(),
            population_size: cohort.population_size(),
            censored: cohort.censored_count(),
            survival_time: estimate(Metric::SurvivalTime)?,
            stroke_time: estimate(Metric::StrokeTime)?,
            discounted_cost: estimate(Metric::DiscountedCost)?,
            discounted_utility: estimate(Metric::DiscountedUtility)?,
        })
    }
}

/// Treatment versus reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub alpha: f64,
    pub treatment: ArmSummary,
    pub reference: ArmSummary,
    pub incremental_cost: Estimate,
    pub incremental_utility: Estimate,
    pub incremental_stroke_time: Estimate,

    /// Incremental cost per unit of incremental utility; `None` when the
    /// utility difference is zero
    pub icer: Option<f64>,
}

/// Compare two simulated cohorts at significance level `alpha`
///
/// # Errors
/// `InvalidSignificance` for `alpha` outside (0, 1), and
/// `InsufficientObservations` when either cohort has fewer than two patients.
pub fn compare_arms(
    treatment: &SimulatedCohort,
    reference: &SimulatedCohort,
    alpha: f64,
) -> Result<ComparisonReport, StatsError> {
    let increase = |name: &str, metric: Metric| -> Result<Estimate, StatsError> {
        let stat = DifferenceStatIndp::between(
            name,
            &treatment.outcome(metric),
            &reference.outcome(metric),
        )?;
        Estimate::from_difference(&stat, alpha)
    };

    let incremental_cost = increase("Increase in cost", Metric::DiscountedCost)?;
    let incremental_utility = increase("Increase in utility", Metric::DiscountedUtility)?;
    let incremental_stroke_time = increase("Increase in stroke", Metric::StrokeTime)?;

    let icer = if incremental_utility.mean != 0.0 {
        Some(incremental_cost.mean / incremental_utility.mean)
    } else {
        None
    };

    Ok(ComparisonReport {
        alpha,
        treatment: ArmSummary::from_cohort(treatment, alpha)?,
        reference: ArmSummary::from_cohort(reference, alpha)?,
        incremental_cost,
        incremental_utility,
        incremental_stroke_time,
        icer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cohort::{Cohort, CohortConfig};
    use crate::models::MarkovModel;

    fn cohorts() -> (SimulatedCohort, SimulatedCohort) {
        let model = MarkovModel::stroke_default().unwrap();
        let reference = Cohort::run(
            CohortConfig {
                population_size: 300,
                ..CohortConfig::new(1, TherapyArm::WithoutTherapy)
            },
            &model,
        )
        .unwrap();
        let treatment = Cohort::run(
            CohortConfig {
                population_size: 300,
                ..CohortConfig::new(2, TherapyArm::WithTherapy)
            },
            &model,
        )
        .unwrap();
        (treatment, reference)
    }

    #[test]
    fn test_increments_are_treatment_minus_reference() {
        let (treatment, reference) = cohorts();
        let report = compare_arms(&treatment, &reference, 0.05).unwrap();

        let expected = report.treatment.discounted_cost.mean - report.reference.discounted_cost.mean;
        assert!((report.incremental_cost.mean - expected).abs() < 1e-9);
        assert!(report.incremental_cost.ci.contains(report.incremental_cost.mean));
        assert_eq!(report.treatment.therapy, TherapyArm::WithTherapy);
        assert_eq!(report.reference.cohort_id, 1);
    }

    #[test]
    fn test_icer_is_cost_over_utility() {
        let (treatment, reference) = cohorts();
        let report = compare_arms(&treatment, &reference, 0.05).unwrap();
        let icer = report.icer.unwrap();
        assert_eq!(
            icer,
            report.incremental_cost.mean / report.incremental_utility.mean
        );
    }

    #[test]
    fn test_invalid_alpha_propagates() {
        let (treatment, reference) = cohorts();
        assert_eq!(
            compare_arms(&treatment, &reference, 0.0),
            Err(StatsError::InvalidSignificance(0.0))
        );
    }
}
