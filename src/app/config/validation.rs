use super::{Config, ConfigError};
use crate::app::logging_system::LogDirective;

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("Page size", self.page_size),
            ("Category page size", self.category_page_size),
            ("Recommendation top-n", self.recommendation_top_n),
            ("Representative review limit", self.representative_review_limit),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidConfig(format!(
                    "{name} must be greater than 0"
                )));
            }
        }

        if !(self.min_rating.is_finite() && self.max_rating.is_finite()) {
            return Err(ConfigError::InvalidConfig(
                "Rating bounds must be finite numbers".to_string(),
            ));
        }

        if self.min_rating > self.max_rating {
            return Err(ConfigError::InvalidConfig(format!(
                "Minimum rating ({}) must not exceed maximum rating ({})",
                self.min_rating, self.max_rating
            )));
        }

        if let Some(max_price) = self.max_price
            && self.min_price > max_price
        {
            return Err(ConfigError::InvalidConfig(format!(
                "Minimum price ({}) must not exceed maximum price ({max_price})",
                self.min_price
            )));
        }

        for raw in &self.log_directives {
            LogDirective::parse(raw).map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;
        }

        if self.page == 0 {
            return Err(ConfigError::InvalidConfig(
                "Page numbers start at 1".to_string(),
            ));
        }

        Ok(())
    }
}
