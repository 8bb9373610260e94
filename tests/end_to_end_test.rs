use std::fs;
use std::path::Path;
use std::time::{Duration, UNIX_EPOCH};
use tempfile::TempDir;

use blogagogo::serve::{lookup, Lookup};
use blogagogo::{Config, Generator, SiteError};

fn write(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).expect("Failed to create parent dir");
    fs::write(path, content).expect("Failed to write file");
}

fn config_for(root: &Path) -> Config {
    Config {
        template_dir: root.join("templates"),
        content_dir: root.join("content"),
        output_dir: root.join("public"),
        dump_file: root.join("state.yaml"),
        static_root: root.join("static"),
        ..Config::default()
    }
}

// Site whose base template includes page fragments instead of being extended
fn create_site(root: &Path) {
    write(
        root,
        "templates/base.tmpl",
        "<html><body><nav>my blog</nav>{% include \"content.html\" %}</body></html>",
    );
    write(
        root,
        "templates/post.tmpl",
        "<article><h1>{{ info.title }}</h1>{{ body | safe }}</article>",
    );
    write(
        root,
        "templates/blog.tmpl",
        "<ul>{% for post in posts %}<li><a href=\"/{{ post.path | safe }}\">{{ post.title }}</a> {{ post.blurb }}</li>{% endfor %}</ul>",
    );
    write(root, "static/style.css", "body { margin: 0 }");
    write(
        root,
        "content/index.tmpl",
        "---\ntitle: Home\n---\n<p>Welcome to {{ info.title }}</p>\n",
    );
    write(
        root,
        "content/2024/launch.md",
        "---\ntitle: Launch\ndate: 2024-05-01\nblurb: We are live\n---\n## Launch day\nIt *works*.\n",
    );
}

#[test]
fn test_full_pipeline() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    create_site(root);

    let mut generator = Generator::new(config_for(root)).expect("Failed to create generator");
    let report = generator.build().expect("Build failed");
    assert_eq!(report.rendered, 2);

    let index = fs::read_to_string(root.join("public/index.html")).unwrap();
    assert_eq!(
        index,
        "<html><body><nav>my blog</nav><p>Welcome to Home</p>\n</body></html>"
    );

    let launch = fs::read_to_string(root.join("public/2024/launch.html")).unwrap();
    assert!(launch.starts_with("<html><body><nav>my blog</nav><article><h1>Launch</h1>"));
    assert!(launch.contains("<em>works</em>"));

    let blog = fs::read_to_string(root.join("public/blog.html")).unwrap();
    assert!(blog.contains("<a href=\"/2024/launch\">Launch</a> We are live"));

    // Every generated page is reachable through the resolver
    let resolver = generator.resolver();
    for request in ["/", "/2024/launch", "/blog/"] {
        match lookup(&resolver, request) {
            Lookup::Found { content_type, .. } => {
                assert_eq!(content_type, "text/html; charset=utf-8")
            }
            other => panic!("{} did not resolve: {:?}", request, other),
        }
    }
    assert_eq!(
        resolver.resolve("style.css").unwrap(),
        root.join("static/style.css")
    );
    assert!(matches!(
        resolver.resolve("2024/missing"),
        Err(SiteError::NoMapping(_))
    ));
}

#[test]
fn test_edit_and_delete_between_runs() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path();
    create_site(root);

    Generator::new(config_for(root))
        .unwrap()
        .build()
        .expect("First build failed");

    // Edit the post, add another one and delete the home page between runs
    let launch = root.join("content/2024/launch.md");
    write(
        root,
        "content/2024/launch.md",
        "---\ntitle: Launch (updated)\ndate: 2024-05-01\n---\nUpdated\n",
    );
    fs::File::options()
        .write(true)
        .open(&launch)
        .unwrap()
        .set_modified(UNIX_EPOCH + Duration::from_secs(1_750_000_000))
        .unwrap();
    write(
        root,
        "content/2024/followup.md",
        "---\ntitle: Follow-up\ndate: 2024-06-01\n---\nMore\n",
    );
    fs::remove_file(root.join("content/index.tmpl")).unwrap();

    let mut generator = Generator::new(config_for(root)).unwrap();
    let report = generator.build().expect("Second build failed");
    assert_eq!(report.rendered, 2);
    assert_eq!(report.pruned, 1);
    assert!(!root.join("public/index.html").exists());

    let blog = fs::read_to_string(root.join("public/blog.html")).unwrap();
    let followup = blog.find("Follow-up").expect("follow-up listed");
    let updated = blog.find("Launch (updated)").expect("updated post listed");
    assert!(followup < updated);
    assert_eq!(generator.tracker().len(), 2);
}
