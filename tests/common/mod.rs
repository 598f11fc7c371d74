//! Common test utilities for integration tests

use etl_append::config::PipelineConfig;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Helper function to create a test input file in a directory
#[allow(dead_code)]
pub fn create_test_file(path: &Path, content: &str) {
    let parent = path.parent().unwrap();
    fs::create_dir_all(parent).unwrap();
    fs::File::create(path)
        .unwrap()
        .write_all(content.as_bytes())
        .unwrap();
}

/// Pipeline configuration with a fixed output name and no log file
#[allow(dead_code)]
pub fn test_config(source: &Path, target: &Path) -> PipelineConfig {
    PipelineConfig {
        source_dir: source.to_path_buf(),
        target_dir: target.to_path_buf(),
        output_file_name: "appended.csv".to_string(),
        log_file: None,
        ..PipelineConfig::default()
    }
}

/// Two people as CSV
#[allow(dead_code)]
pub const SAMPLE_CSV: &str = "name,height,weight\nAlex,65.78,112.99\nAjay,71.52,136.49\n";

/// Two people as JSON lines
#[allow(dead_code)]
pub const SAMPLE_JSON: &str = concat!(
    r#"{"name":"Alice","height":69.4,"weight":153.03}"#,
    "\n",
    r#"{"name":"Ravi","height":68.22,"weight":142.34}"#,
    "\n"
);

/// Two people as XML
#[allow(dead_code)]
pub const SAMPLE_XML: &str = r#"<?xml version="1.0"?>
<data>
  <person>
    <name>Jack</name>
    <height>68.7</height>
    <weight>123.3</weight>
  </person>
  <person>
    <name>Tom</name>
    <height>69.8</height>
    <weight>141.49</weight>
  </person>
</data>"#;

/// XML whose second record lacks a weight
#[allow(dead_code)]
pub const XML_MISSING_WEIGHT: &str = r#"<?xml version="1.0"?>
<data>
  <person>
    <name>Jack</name>
    <height>68.7</height>
    <weight>123.3</weight>
  </person>
  <person>
    <name>Tom</name>
    <height>69.8</height>
  </person>
</data>"#;
