//! Declarative macros for the pipeline DSL
//!
//! `stage!` and `job!` name what they declare after the variable they bind,
//! so a pipeline reads as a list of declarations.

/// Declares a stage named after the binding.
///
/// `stage!(ci, build);` expands to `let build = ci.stage("build");`.
#[macro_export]
macro_rules! stage {
    ($ci:expr, $name:ident) => {
        let $name = $ci.stage(stringify!($name));
    };
}

/// Declares a job named after the binding and propagates its errors.
///
/// Must be used in a function returning `Result<_, PipelineError>`, such as
/// the block given to [`gitlab_ci`](crate::pipeline::gitlab_ci).
///
/// ```
/// use gitlab_ci_dsl::prelude::*;
///
/// let ci = gitlab_ci(|ci| {
///     stage!(ci, build);
///     job!(ci, compile, stage = build, |job| {
///         job.script(|s| {
///             s.shell("make");
///         });
///         Ok(())
///     });
///     job!(ci, package, |job| {
///         job.needs(&compile);
///         Ok(())
///     });
///     Ok(())
/// })
/// .unwrap();
///
/// assert!(ci.job_named("compile").is_some());
/// ```
#[macro_export]
macro_rules! job {
    ($ci:expr, $name:ident, stage = $stage:ident, $body:expr $(,)?) => {
        let $name = $ci.job(stringify!($name), Some(&$stage), $body)?;
    };
    ($ci:expr, $name:ident, $body:expr $(,)?) => {
        let $name = $ci.job(stringify!($name), None, $body)?;
    };
}

/// Builds a [`Yaml`](crate::yaml::Yaml) map from `key => value` pairs.
#[macro_export]
macro_rules! yaml_map {
    () => {
        $crate::yaml::Yaml::Map($crate::yaml::Mapping::new())
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut mapping = $crate::yaml::Mapping::new();
        $(
            mapping.insert_str($key, $value);
        )+
        $crate::yaml::Yaml::Map(mapping)
    }};
}

#[cfg(test)]
mod tests {
    use crate::pipeline::{GitLabCi, PipelineError, Stage, gitlab_ci};
    use crate::yaml::Yaml;

    #[test]
    fn test_stage_macro_uses_binding_name() {
        let mut ci = GitLabCi::new();
        stage!(ci, deploy);

        assert_eq!(deploy.name(), "deploy");
        assert_eq!(ci.stages().map(Stage::name).collect::<Vec<_>>(), vec!["deploy"]);
    }

    #[test]
    fn test_job_macro() {
        let ci = gitlab_ci(|ci| {
            stage!(ci, test);
            job!(ci, unit_tests, stage = test, |job| {
                job.script(|s| {
                    s.shell("cargo test");
                });
                Ok(())
            });
            job!(ci, report, |job| {
                job.needs(&unit_tests);
                Ok(())
            });
            let _ = report;
            Ok(())
        })
        .unwrap();

        let unit = ci.job_named("unit_tests").unwrap();
        assert_eq!(unit.stage().map(Stage::name), Some("test"));
        assert!(ci.render().contains("- job: unit_tests\n"));
    }

    #[test]
    fn test_job_macro_propagates_errors() {
        fn build() -> Result<GitLabCi, PipelineError> {
            gitlab_ci(|ci| {
                job!(ci, flaky, |job| {
                    job.retry_max(9)?;
                    Ok(())
                });
                let _ = flaky;
                Ok(())
            })
        }

        assert!(build().is_err());
    }

    #[test]
    fn test_yaml_map_macro() {
        let empty = yaml_map!();
        assert_eq!(empty.to_yaml_string(), "{}\n");

        let node = yaml_map! {
            "name" => "docs",
            "retry" => 2,
            "paths" => vec!["public"],
        };
        assert_eq!(node.get("retry"), Some(&Yaml::Integer(2)));
        assert_eq!(node.to_yaml_string(), "name: docs\nretry: 2\npaths:\n  - public\n");
    }
}
