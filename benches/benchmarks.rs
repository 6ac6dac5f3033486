//! Benchmark suite for manifest-libs
//!
//! Run with: `cargo bench --bench benchmarks`
//! View report: `open target/criterion/report/index.html`

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use manifest_libs::file_types::ConfigFormat;
use manifest_libs::parsers::Parser;
use manifest_libs::parsers::conan::ConanTxtParser;
use manifest_libs::parsers::go::GoParser;
use manifest_libs::parsers::gradle::{GradleDialect, GradleParser};
use manifest_libs::parsers::maven::MavenParser;
use manifest_libs::parsers::npm::NpmParser;
use manifest_libs::parsers::python::PipParser;
use manifest_libs::parsers::ruby::GemfileLockParser;
use manifest_libs::processor::ConfigFile;
use manifest_libs::registry::Registry;
use manifest_libs::validation::{sanitize_version, validate_name, validate_version};

// =============================================================================
// Test Data Generation
// =============================================================================

/// Name for the `i`-th generated entry, cycling through `names` with a numeric
/// suffix once the list is exhausted.
fn nth<'a>(names: &[(&'a str, &'a str)], i: usize) -> (String, &'a str) {
    let (name, version) = names[i % names.len()];
    if i >= names.len() {
        (format!("{name}-{}", i / names.len()), version)
    } else {
        (name.to_string(), version)
    }
}

fn generate_package_json(dep_count: usize) -> String {
    let deps = [
        ("express", "^4.18.0"),
        ("react", "^18.2.0"),
        ("typescript", "^5.0.0"),
        ("lodash", "^4.17.0"),
        ("axios", "^1.6.0"),
        ("webpack", "^5.90.0"),
        ("eslint", "^8.56.0"),
        ("prettier", "^3.2.0"),
        ("jest", "^29.7.0"),
        ("dotenv", "^16.4.0"),
    ];

    let entries: Vec<String> = (0..dep_count)
        .map(|i| {
            let (name, version) = nth(&deps, i);
            format!("\"{name}\": \"{version}\"")
        })
        .collect();

    format!(
        r#"{{
  "name": "test-project",
  "version": "1.0.0",
  "dependencies": {{
    {}
  }}
}}"#,
        entries.join(",\n    ")
    )
}

fn generate_requirements_txt(dep_count: usize) -> String {
    let deps = [
        ("requests", ">=2.31.0"),
        ("flask", "==3.0.0"),
        ("django", ">=4.2,<5.0"),
        ("numpy", "~=1.26.0"),
        ("pandas", ">=2.1.0"),
        ("pytest", "==7.4.3"),
    ];

    let mut content = String::from("# Generated requirements\n");
    for i in 0..dep_count {
        let (name, version) = nth(&deps, i);
        content.push_str(&format!("{name}{version}  # pinned\n"));
    }
    content
}

fn generate_go_mod(dep_count: usize) -> String {
    let deps = [
        ("github.com/gin-gonic/gin", "v1.9.1"),
        ("github.com/stretchr/testify", "v1.8.4"),
        ("go.uber.org/zap", "v1.26.0"),
        ("golang.org/x/sync", "v0.5.0"),
        ("github.com/spf13/cobra", "v1.8.0"),
    ];

    let mut content = String::from("module example.com/test\n\ngo 1.21\n\nrequire (\n");
    for i in 0..dep_count {
        let (name, version) = nth(&deps, i);
        let marker = if i % 4 == 3 { " // indirect" } else { "" };
        content.push_str(&format!("\t{name} {version}{marker}\n"));
    }
    content.push_str(")\n");
    content
}

fn generate_conanfile_txt(dep_count: usize) -> String {
    let deps = [
        ("zlib", "1.2.13"),
        ("openssl", "3.1.0"),
        ("boost", "1.81.0"),
        ("fmt", "[>=9.0 <10]"),
        ("spdlog", "1.11.0"),
    ];

    let mut content = String::from("[requires]\n");
    for i in 0..dep_count {
        let (name, version) = nth(&deps, i);
        content.push_str(&format!("{name}/{version}#rev{i}\n"));
    }
    content.push_str("\n[generators]\nCMakeDeps\n");
    content
}

fn generate_build_gradle(dep_count: usize) -> String {
    let deps = [
        ("org.springframework:spring-core", "$springVersion"),
        ("com.google.guava:guava", "31.1-jre"),
        ("org.slf4j:slf4j-api", "2.0.9"),
        ("com.fasterxml.jackson.core:jackson-databind", "2.15.2"),
    ];

    let mut content = String::from("ext {\n    springVersion = '5.3.20'\n}\n\ndependencies {\n");
    for i in 0..dep_count {
        let (coordinates, version) = nth(&deps, i);
        content.push_str(&format!("    implementation \"{coordinates}:{version}\"\n"));
    }
    content.push_str("}\n");
    content
}

fn generate_pom_xml(dep_count: usize) -> String {
    let deps = [
        ("junit", "4.13.2"),
        ("spring-core", "${spring.version}"),
        ("slf4j-api", "2.0.9"),
        ("commons-lang3", "3.13.0"),
    ];

    let mut content = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <version>1.0.0</version>
  <properties>
    <spring.version>5.3.20</spring.version>
  </properties>
  <dependencies>
"#,
    );
    for i in 0..dep_count {
        let (artifact, version) = nth(&deps, i);
        content.push_str(&format!(
            "    <dependency>\n      <groupId>org.example</groupId>\n      <artifactId>{artifact}</artifactId>\n      <version>{version}</version>\n    </dependency>\n"
        ));
    }
    content.push_str("  </dependencies>\n</project>\n");
    content
}

fn generate_gemfile_lock(dep_count: usize) -> String {
    let deps = [
        ("rails", "7.1.2"),
        ("rack", "2.2.8"),
        ("nokogiri", "1.15.4-x86_64-linux"),
        ("puma", "6.4.0"),
        ("sidekiq", "7.2.0"),
    ];

    let mut content = String::from("GEM\n  remote: https://rubygems.org/\n  specs:\n");
    for i in 0..dep_count {
        let (name, version) = nth(&deps, i);
        content.push_str(&format!("    {name} ({version})\n      racc (~> 1.4)\n"));
    }
    content.push_str("\nPLATFORMS\n  x86_64-linux\n\nBUNDLED WITH\n   2.4.22\n");
    content
}

// =============================================================================
// Parsing Benchmarks
// =============================================================================

fn bench_parsers(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsers");

    for dep_count in [10, 50, 100] {
        // package.json
        let npm_content = generate_package_json(dep_count);
        let npm_parser = NpmParser::new();
        group.bench_with_input(
            BenchmarkId::new("package_json", dep_count),
            &npm_content,
            |b, content| {
                b.iter(|| npm_parser.parse(black_box(content)));
            },
        );

        // requirements.txt
        let pip_content = generate_requirements_txt(dep_count);
        let pip_parser = PipParser::new();
        group.bench_with_input(
            BenchmarkId::new("requirements_txt", dep_count),
            &pip_content,
            |b, content| {
                b.iter(|| pip_parser.parse(black_box(content)));
            },
        );

        // go.mod
        let go_content = generate_go_mod(dep_count);
        let go_parser = GoParser::new();
        group.bench_with_input(
            BenchmarkId::new("go_mod", dep_count),
            &go_content,
            |b, content| {
                b.iter(|| go_parser.parse(black_box(content)));
            },
        );

        // conanfile.txt
        let conan_content = generate_conanfile_txt(dep_count);
        let conan_parser = ConanTxtParser::new();
        group.bench_with_input(
            BenchmarkId::new("conanfile_txt", dep_count),
            &conan_content,
            |b, content| {
                b.iter(|| conan_parser.parse(black_box(content)));
            },
        );

        // build.gradle
        let gradle_content = generate_build_gradle(dep_count);
        let gradle_parser = GradleParser::new(GradleDialect::Groovy);
        group.bench_with_input(
            BenchmarkId::new("build_gradle", dep_count),
            &gradle_content,
            |b, content| {
                b.iter(|| gradle_parser.parse(black_box(content)));
            },
        );

        // pom.xml
        let maven_content = generate_pom_xml(dep_count);
        let maven_parser = MavenParser::new();
        group.bench_with_input(
            BenchmarkId::new("pom_xml", dep_count),
            &maven_content,
            |b, content| {
                b.iter(|| maven_parser.parse(black_box(content)));
            },
        );

        // Gemfile.lock
        let ruby_content = generate_gemfile_lock(dep_count);
        let ruby_parser = GemfileLockParser::new();
        group.bench_with_input(
            BenchmarkId::new("gemfile_lock", dep_count),
            &ruby_content,
            |b, content| {
                b.iter(|| ruby_parser.parse(black_box(content)));
            },
        );
    }

    group.finish();
}

// =============================================================================
// Processor Benchmarks
// =============================================================================

fn bench_processor(c: &mut Criterion) {
    let mut group = c.benchmark_group("processor");

    for dep_count in [10, 100] {
        let cases = [
            (ConfigFormat::JavascriptNpm, "package.json", generate_package_json(dep_count)),
            (ConfigFormat::JavaMaven, "pom.xml", generate_pom_xml(dep_count)),
            (ConfigFormat::RubyGemsLock, "Gemfile.lock", generate_gemfile_lock(dep_count)),
        ];

        for (format, path, content) in cases {
            group.bench_with_input(
                BenchmarkId::new(format.id(), dep_count),
                content.as_bytes(),
                |b, raw| {
                    b.iter(|| ConfigFile::new(format, path, black_box(raw)).parse());
                },
            );
        }
    }

    group.finish();
}

// =============================================================================
// Validation Benchmarks
// =============================================================================

fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");

    let versions = [
        "1.2.3",
        "v0.15.0",
        "31.1-jre",
        "1.0.0-beta.1+build.5",
        "2.0.0rc1",
        ">=2.0,<3.0",
    ];
    group.bench_function("sanitize_version", |b| {
        b.iter(|| {
            for version in versions {
                black_box(sanitize_version(black_box(version)));
            }
        });
    });

    let names = ["left-pad", "golang.org/x/mod", "Newtonsoft.Json", "bad name!"];
    group.bench_function("validate_name", |b| {
        b.iter(|| {
            for name in names {
                let _ = black_box(validate_name(black_box(name)));
            }
        });
    });

    group.bench_function("validate_version", |b| {
        b.iter(|| {
            for version in ["1.2.3", ">=2.0,<3.0", "^4.17.0", "1.0; rm"] {
                let _ = black_box(validate_version(black_box(version)));
            }
        });
    });

    group.finish();
}

// =============================================================================
// Registry Benchmarks
// =============================================================================

fn bench_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry");
    let registry = Registry::new();

    for file_count in [100, 1000] {
        let paths: Vec<String> = (0..file_count)
            .map(|i| match i % 5 {
                0 => format!("services/svc{i}/go.mod"),
                1 => format!("web/app{i}/package.json"),
                2 => format!("src/module{i}/main.rs"),
                3 => format!("python/pkg{i}/requirements-{i}.txt"),
                _ => format!("docs/page{i}.md"),
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::new("select_paths", file_count),
            &paths,
            |b, paths| {
                b.iter(|| registry.select_paths(black_box(paths)));
            },
        );
    }

    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(
    benches,
    bench_parsers,
    bench_processor,
    bench_validation,
    bench_registry,
);

criterion_main!(benches);
