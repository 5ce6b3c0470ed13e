use crate::models::response::PointValue;
use crate::models::{LimingAdvice, SoilParameter, SoilRecord};
use crate::utils::constants::LIMING_PH_THRESHOLD;

/// Basic liming advice driven by soil pH.
pub struct SoilAdvisor {
    ph_threshold: f64,
}

impl SoilAdvisor {
    pub fn new() -> Self {
        Self {
            ph_threshold: LIMING_PH_THRESHOLD,
        }
    }

    pub fn with_threshold(ph_threshold: f64) -> Self {
        Self { ph_threshold }
    }

    pub fn advise(&self, record: &SoilRecord) -> LimingAdvice {
        let ph = record.get(SoilParameter::Ph);
        let (liming, message) = match ph {
            Some(ph) if ph < self.ph_threshold => (
                true,
                format!(
                    "Liming recommended for point {} ({}): pH {} is below {}.",
                    record.point, record.depth, ph, self.ph_threshold
                ),
            ),
            Some(ph) => (
                false,
                format!(
                    "pH {} at point {} ({}) is adequate. Light nitrogen fertilization recommended.",
                    ph, record.point, record.depth
                ),
            ),
            // A missing reading is not a pH of zero.
            None => (
                false,
                format!(
                    "No pH reading for point {} ({}); no liming recommendation can be made.",
                    record.point, record.depth
                ),
            ),
        };

        LimingAdvice {
            talhao: record.plot_id.clone(),
            ponto: PointValue::from(record.point.as_str()),
            profundidade: record.depth.clone(),
            ph,
            calagem_recomendada: liming,
            mensagem: message,
        }
    }
}

impl Default for SoilAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ph: Option<f64>) -> SoilRecord {
        SoilRecord::new("CA01".to_string(), "3".to_string(), "0 a 20 cm".to_string())
            .with_parameter(SoilParameter::Ph, ph)
    }

    #[test]
    fn test_acid_soil_needs_liming() {
        let advice = SoilAdvisor::new().advise(&record(Some(4.8)));
        assert!(advice.calagem_recomendada);
        assert_eq!(advice.ph, Some(4.8));
        assert!(advice.mensagem.contains("Liming recommended"));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let advice = SoilAdvisor::new().advise(&record(Some(5.5)));
        assert!(!advice.calagem_recomendada);
        assert!(advice.mensagem.contains("adequate"));
    }

    #[test]
    fn test_missing_ph_is_not_zero() {
        let advice = SoilAdvisor::new().advise(&record(None));
        assert!(!advice.calagem_recomendada);
        assert_eq!(advice.ph, None);
        assert!(advice.mensagem.contains("No pH reading"));
    }

    #[test]
    fn test_custom_threshold() {
        let advice = SoilAdvisor::with_threshold(6.0).advise(&record(Some(5.8)));
        assert!(advice.calagem_recomendada);
    }
}
