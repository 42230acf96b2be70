use super::env_helpers::{
    load_env_enum, load_env_list, load_env_path, load_env_path_opt, load_env_var,
};
use super::groups::{
    DEFAULT_POPULAR_COUNT, DEFAULT_REVIEW_LIMIT, InsightConfig, PaginationConfig,
};
use super::{ConfigError, LogFormat, LogLevel};
use crate::aggregation::DEFAULT_TOP_N;
use crate::catalog::FilterCriteria;
use crate::catalog::filter::MAX_RATING;
use crate::domain::SortOption;
use crate::pagination::{DEFAULT_CATEGORY_PAGE_SIZE, DEFAULT_PAGE_SIZE};
use crate::trend::TrendFrequency;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(author, version, about, long_about = None)]
#[serde(default)]
pub struct Config {
    /// Product catalog JSON file
    #[arg(long, env = "CATALOG_PATH", default_value = "data/catalog.json")]
    pub catalog_path: PathBuf,

    /// Reviews JSON file used for representative reviews and rating trends
    #[arg(long, env = "REVIEWS_PATH")]
    pub reviews_path: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,

    /// Extra `target=level` log filter directives (repeatable)
    #[arg(long = "log-directive", env = "LOG_DIRECTIVES", value_delimiter = ',')]
    pub log_directives: Vec<String>,

    /// Results per page when all results share one category
    #[arg(long, env = "PAGE_SIZE", default_value = "10")]
    pub page_size: usize,

    /// Results per page inside each category section
    #[arg(long, env = "CATEGORY_PAGE_SIZE", default_value = "6")]
    pub category_page_size: usize,

    /// Maximum recommendations requested per category
    #[arg(long, env = "RECOMMENDATION_TOP_N", default_value = "100")]
    pub recommendation_top_n: usize,

    /// Representative review references considered per product
    #[arg(long, env = "REPRESENTATIVE_REVIEW_LIMIT", default_value = "3")]
    pub representative_review_limit: usize,

    /// Products shown in the popular list when no filter is active
    #[arg(long, env = "POPULAR_COUNT", default_value = "5")]
    pub popular_count: usize,

    /// Configuration file path (optional)
    #[arg(long, env = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Search text matched against name, brand and keywords
    #[arg(long, default_value = "")]
    pub query: String,

    /// Sub-category filter (repeatable)
    #[arg(long = "sub-category")]
    pub sub_categories: Vec<String>,

    /// Skin type filter (repeatable)
    #[arg(long = "skin-type")]
    pub skin_types: Vec<String>,

    #[arg(long, default_value = "0")]
    pub min_rating: f64,

    #[arg(long, default_value = "5")]
    pub max_rating: f64,

    #[arg(long, default_value = "0")]
    pub min_price: u64,

    #[arg(long)]
    pub max_price: Option<u64>,

    /// Result ordering
    #[arg(long, value_enum, default_value = "recommended")]
    pub sort: SortOption,

    /// Result page to show
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Product name to open in the detail view
    #[arg(long)]
    pub select: Option<String>,

    /// Bucket size of the rating trend
    #[arg(long, value_enum, default_value = "monthly")]
    pub trend_frequency: TrendFrequency,

    /// Derived fields (not CLI arguments)
    #[serde(skip)]
    #[arg(skip)]
    pub pagination: PaginationConfig,

    #[serde(skip)]
    #[arg(skip)]
    pub insight: InsightConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("data/catalog.json"),
            reviews_path: None,
            log_level: LogLevel::Info,
            log_format: LogFormat::Pretty,
            log_directives: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            category_page_size: DEFAULT_CATEGORY_PAGE_SIZE,
            recommendation_top_n: DEFAULT_TOP_N,
            representative_review_limit: DEFAULT_REVIEW_LIMIT,
            popular_count: DEFAULT_POPULAR_COUNT,
            config_file: None,
            query: String::new(),
            sub_categories: Vec::new(),
            skin_types: Vec::new(),
            min_rating: 0.0,
            max_rating: MAX_RATING,
            min_price: 0,
            max_price: None,
            sort: SortOption::Recommended,
            page: 1,
            select: None,
            trend_frequency: TrendFrequency::Monthly,
            pagination: PaginationConfig::default(),
            insight: InsightConfig::default(),
        }
    }
}

impl Config {
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut config = Config::parse_from(args);
        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        load_env_path("CATALOG_PATH", &mut config.catalog_path);
        load_env_path_opt("REVIEWS_PATH", &mut config.reviews_path);
        load_env_enum("LOG_LEVEL", &mut config.log_level)?;
        load_env_enum("LOG_FORMAT", &mut config.log_format)?;
        load_env_list("LOG_DIRECTIVES", &mut config.log_directives);
        load_env_var("PAGE_SIZE", &mut config.page_size)?;
        load_env_var("CATEGORY_PAGE_SIZE", &mut config.category_page_size)?;
        load_env_var("RECOMMENDATION_TOP_N", &mut config.recommendation_top_n)?;
        load_env_var(
            "REPRESENTATIVE_REVIEW_LIMIT",
            &mut config.representative_review_limit,
        )?;
        load_env_var("POPULAR_COUNT", &mut config.popular_count)?;
        load_env_path_opt("CONFIG_FILE", &mut config.config_file);

        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    /// Takes settings from the file and keeps the query inputs of `self`.
    pub fn merge_file(&self, path: &Path) -> Result<Self, ConfigError> {
        let file = Self::from_file(path)?;
        let mut merged = Config {
            config_file: Some(path.to_path_buf()),
            query: self.query.clone(),
            sub_categories: self.sub_categories.clone(),
            skin_types: self.skin_types.clone(),
            min_rating: self.min_rating,
            max_rating: self.max_rating,
            min_price: self.min_price,
            max_price: self.max_price,
            sort: self.sort,
            page: self.page,
            select: self.select.clone(),
            trend_frequency: self.trend_frequency,
            ..file
        };
        merged.post_process()?;
        merged.validate()?;
        Ok(merged)
    }

    pub fn post_process(&mut self) -> Result<(), ConfigError> {
        self.pagination = PaginationConfig {
            page_size: self.page_size,
            category_page_size: self.category_page_size,
        };
        self.insight = InsightConfig {
            recommendation_top_n: self.recommendation_top_n,
            representative_review_limit: self.representative_review_limit,
            popular_count: self.popular_count,
        };
        self.query = self.query.trim().to_string();
        Ok(())
    }

    /// Filter inputs as search criteria.
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            query: self.query.clone(),
            sub_categories: self.sub_categories.clone(),
            skin_types: self.skin_types.clone(),
            min_rating: self.min_rating,
            max_rating: self.max_rating,
            min_price: self.min_price,
            max_price: self.max_price.unwrap_or(u64::MAX),
            sort: self.sort,
        }
    }
}
