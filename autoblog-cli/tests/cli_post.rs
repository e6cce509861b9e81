use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn scaffold_site(root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    fs::write(
        root.join("autoblog.yml"),
        r#"
site:
  url: "https://example.com"
paths:
  year: "2025"
  reference_image: null
"#,
    )?;

    let blog = root.join("blog");
    fs::create_dir_all(blog.join("2025").join("nisa-start-guide4"))?;
    fs::write(
        blog.join("category-nisa.html"),
        "<main>\n            <!-- 記事: nisa-start-guide4 -->\n</main>\n",
    )?;
    fs::write(
        blog.join("index.html"),
        "<section>\n<!-- NISA 系（日付降順） -->\n</section>\n<section>\n<!-- 投資信託 系 -->\n</section>\n",
    )?;
    fs::write(
        root.join("sitemap.xml"),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset>\n</urlset>\n",
    )?;
    Ok(())
}

#[test]
fn post_generates_page_and_updates_indexes() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    scaffold_site(dir.path())?;
    fs::write(
        dir.path().join("script.txt"),
        "新NISAで始める資産形成\n\n第1章 つみたて投資枠\n毎月コツコツ積み立てるのが大切です。\n",
    )?;

    #[allow(deprecated)]
    Command::cargo_bin("autoblog")?
        .current_dir(dir.path())
        .env_remove("GEMINI_API_KEY")
        .arg("script.txt")
        .assert()
        .success();

    let post_dir = dir.path().join("blog/2025/nisa-start-guide5");
    let html = fs::read_to_string(post_dir.join("nisa-start-guide5.html"))?;
    assert!(html.contains("<title>新NISAで始める資産形成 | 未来投資navi</title>"));
    assert!(html.contains(
        "https://example.com/blog/2025/nisa-start-guide5/nisa-start-guide5.html"
    ));
    assert_eq!(html.matches("class=\"youtube-cta\"").count(), 1);
    assert!(html.contains("class=\"line-cta\""));

    // No credential: the image is an empty placeholder
    assert_eq!(fs::metadata(post_dir.join("nisa-start-guide5-image.jpg"))?.len(), 0);

    let category = fs::read_to_string(dir.path().join("blog/category-nisa.html"))?;
    assert!(category.find("<!-- 記事: nisa-start-guide5 -->").unwrap()
        < category.find("<!-- 記事: nisa-start-guide4 -->").unwrap());

    let index = fs::read_to_string(dir.path().join("blog/index.html"))?;
    assert!(index.contains(
        "<!-- NISA 系（日付降順） -->\n      <a class=\"card\" href=\"2025/nisa-start-guide5/nisa-start-guide5.html\">"
    ));

    let sitemap = fs::read_to_string(dir.path().join("sitemap.xml"))?;
    assert!(sitemap.contains("<changefreq>weekly</changefreq>"));
    assert!(sitemap.trim_end().ends_with("</url>\n</urlset>"));

    Ok(())
}

#[test]
fn post_subcommand_honours_overrides() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    scaffold_site(dir.path())?;
    fs::write(dir.path().join("memo.txt"), "地元の話\n")?;
    fs::write(dir.path().join("header.png"), b"png")?;

    #[allow(deprecated)]
    Command::cargo_bin("autoblog")?
        .current_dir(dir.path())
        .env_remove("GEMINI_API_KEY")
        .args([
            "post",
            "memo.txt",
            "--slug",
            "special-edition",
            "--category",
            "mutual-fund",
            "--image",
            "header.png",
        ])
        .assert()
        .success();

    let post_dir = dir.path().join("blog/2025/special-edition");
    assert_eq!(fs::read(post_dir.join("special-edition-image.jpg"))?, b"png");

    let index = fs::read_to_string(dir.path().join("blog/index.html"))?;
    assert!(index.contains(
        "<!-- 投資信託 系 -->\n      <a class=\"card\" href=\"2025/special-edition/"
    ));

    Ok(())
}

#[test]
fn missing_input_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    scaffold_site(dir.path())?;

    #[allow(deprecated)]
    Command::cargo_bin("autoblog")?
        .current_dir(dir.path())
        .env_remove("GEMINI_API_KEY")
        .arg("nope.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    assert!(!dir.path().join("blog/2025/region1").exists());
    Ok(())
}

#[test]
fn sitemap_regenerates_from_posts() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    scaffold_site(dir.path())?;
    let post_dir = dir.path().join("blog/2025/region2");
    fs::create_dir_all(&post_dir)?;
    fs::write(post_dir.join("region2.html"), "<title>地方の暮らし | 未来投資navi</title>")?;

    #[allow(deprecated)]
    Command::cargo_bin("autoblog")?
        .current_dir(dir.path())
        .arg("sitemap")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 posts"));

    let sitemap = fs::read_to_string(dir.path().join("sitemap.xml"))?;
    assert!(sitemap.contains("<loc>https://example.com/blog/category-region.html</loc>"));
    assert!(sitemap.contains("<loc>https://example.com/blog/2025/region2/region2.html</loc>"));
    // nisa-start-guide4 has no HTML file and is not listed
    assert!(!sitemap.contains("nisa-start-guide4"));

    Ok(())
}

#[test]
fn init_refuses_to_overwrite() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;

    #[allow(deprecated)]
    Command::cargo_bin("autoblog")?
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
    assert!(dir.path().join("autoblog.yml").exists());

    #[allow(deprecated)]
    Command::cargo_bin("autoblog")?
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    Ok(())
}
