use super::*;
use crate::selectors::LayoutSet;

fn layout(name: &str) -> CompiledLayout {
    let layouts = cosme_core::builtin_layouts();
    let found = layouts
        .iter()
        .find(|l| l.name == name)
        .expect("built-in layout");
    CompiledLayout::compile(found).expect("built-in layout compiles")
}

fn listing_url() -> Url {
    Url::parse("https://www.cosme.net/products/10240630/review/?page=1").unwrap()
}

const COSME_2024_PAGE: &str = r#"
<html><body>
<div id="product-review-list">
  <div class="review">
    <div class="head">
      <div class="reviewer-info">
        <span class="age">30代</span>
        <span class="gender">女性</span>
        <span class="skin">乾燥肌</span>
      </div>
    </div>
    <div class="body">
      <div class="rating clearfix">
        <p class="reviewer-rating">4.5</p>
        <p class="mobile-date">2024/05/12</p>
      </div>
      <p>しっとりするのに
         べたつかない。</p>
      <a class="read-more" href="/products/10240630/review/505/">続きを読む</a>
    </div>
  </div>
  <div class="review">
    <div class="head"><div class="reviewer-info">不明</div></div>
    <div class="body">
      <p>香りが苦手でした</p>
    </div>
  </div>
</div>
</body></html>
"#;

// -----------------------------------------------------------------------
// cosme-2024
// -----------------------------------------------------------------------

#[test]
fn parses_entries_in_document_order() {
    let items = parse_listing(COSME_2024_PAGE, &layout("cosme-2024"), Some(&listing_url()));
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].entry.body_text, "しっとりするのに べたつかない。");
    assert_eq!(items[1].entry.body_text, "香りが苦手でした");
}

#[test]
fn first_entry_has_every_field() {
    let items = parse_listing(COSME_2024_PAGE, &layout("cosme-2024"), Some(&listing_url()));
    let first = &items[0];
    assert_eq!(first.entry.rating, Some(4.5));
    assert_eq!(first.entry.raw_profile, "30代 女性 乾燥肌");
    assert_eq!(first.entry.posted_at, "2024/05/12");
    assert_eq!(
        first.detail_link.as_deref(),
        Some("https://www.cosme.net/products/10240630/review/505/")
    );
}

#[test]
fn missing_nodes_degrade_to_empty_fields() {
    let items = parse_listing(COSME_2024_PAGE, &layout("cosme-2024"), Some(&listing_url()));
    let second = &items[1];
    assert_eq!(second.entry.rating, None);
    assert_eq!(second.entry.raw_profile, "不明");
    assert_eq!(second.entry.posted_at, "");
    assert!(second.detail_link.is_none());
}

#[test]
fn body_does_not_leak_rating_or_date_text() {
    let markup = r#"
        <div id="product-review-list"><div>
          <div class="body">
            <p class="reviewer-rating">5</p>
            <p>満足です</p>
            <p class="mobile-date">2023/01/01</p>
          </div>
        </div></div>
    "#;
    let items = parse_listing(markup, &layout("cosme-2024"), None);
    assert_eq!(items[0].entry.body_text, "満足です");
}

#[test]
fn entry_with_no_sub_elements_is_all_empty() {
    let markup = r#"<div id="product-review-list"><div></div></div>"#;
    let items = parse_listing(markup, &layout("cosme-2024"), None);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].entry, ReviewEntry::default());
    assert!(items[0].detail_link.is_none());
}

#[test]
fn unparseable_rating_text_is_none() {
    let markup = r#"
        <div id="product-review-list"><div>
          <div class="body"><div class="rating clearfix">
            <p class="reviewer-rating">評価なし</p>
          </div></div>
        </div></div>
    "#;
    let items = parse_listing(markup, &layout("cosme-2024"), None);
    assert_eq!(items[0].entry.rating, None);
}

#[test]
fn no_matching_entries_yields_empty_vec() {
    let items = parse_listing(
        "<html><body><p>レビューはまだありません</p></body></html>",
        &layout("cosme-2024"),
        None,
    );
    assert!(items.is_empty());
}

#[test]
fn relative_link_without_page_url_is_dropped() {
    let items = parse_listing(COSME_2024_PAGE, &layout("cosme-2024"), None);
    assert!(items[0].detail_link.is_none());
}

// -----------------------------------------------------------------------
// other layouts
// -----------------------------------------------------------------------

#[test]
fn cosme_2022_reads_star_class_and_excludes_read_more_text() {
    let markup = r#"
        <div class="review-sec">
          <div class="rating-stars star-4"></div>
          <p class="reviewer-attr">20代後半・女性・混合肌</p>
          <p class="read">泡立ちが良い<span class="read-more"><a href="https://www.cosme.net/reviews/77/">もっと見る</a></span></p>
          <p class="date">2022.11.03</p>
        </div>
    "#;
    let items = parse_listing(markup, &layout("cosme-2022"), Some(&listing_url()));
    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item.entry.rating, Some(4.0));
    assert_eq!(item.entry.raw_profile, "20代後半・女性・混合肌");
    assert_eq!(item.entry.body_text, "泡立ちが良い");
    assert_eq!(item.entry.posted_at, "2022.11.03");
    assert_eq!(
        item.detail_link.as_deref(),
        Some("https://www.cosme.net/reviews/77/")
    );
}

#[test]
fn cosme_2022_falls_back_to_second_rating_selector_without_class() {
    let markup = r#"
        <div class="review-sec">
          <p class="reviewer-rating">5</p>
        </div>
    "#;
    let items = parse_listing(markup, &layout("cosme-2022"), None);
    // ClassSuffix applies to whichever node matched; no class → no rating.
    assert_eq!(items[0].entry.rating, None);
}

#[test]
fn cosme_card_uses_second_entry_candidate() {
    let markup = r#"
        <div class="review-card">
          <span class="rating-value">3</span>
          <div class="user-profile">40代 男性 脂性肌</div>
          <div class="review-text">さっぱり</div>
          <time datetime="2024-02-01">2024-02-01</time>
        </div>
        <div class="review-card">
          <div class="review-text">二件目</div>
        </div>
    "#;
    let items = parse_listing(markup, &layout("cosme-card"), None);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].entry.rating, Some(3.0));
    assert_eq!(items[0].entry.raw_profile, "40代 男性 脂性肌");
    assert_eq!(items[0].entry.posted_at, "2024-02-01");
    assert_eq!(items[1].entry.body_text, "二件目");
}

#[test]
fn rating_tie_break_uses_first_selector_only() {
    let markup = r#"
        <ul class="review-list"><li class="review-card">
          <span class="rating"><span class="num">2</span></span>
          <span class="rating-value">--</span>
        </li></ul>
    "#;
    let items = parse_listing(markup, &layout("cosme-card"), None);
    // `.rating-value` wins even though its text is not a number.
    assert_eq!(items[0].entry.rating, None);
}

#[test]
fn cosme_table_reads_rate_class_from_nested_span() {
    let markup = r#"
        <table class="review-table">
          <tr class="review">
            <td class="reviewer">50歳 女性 敏感肌</td>
            <td class="rating"><span class="icon rate-5"></span></td>
            <td class="comment">刺激がない<span class="date">2019年4月1日</span></td>
          </tr>
        </table>
    "#;
    let items = parse_listing(markup, &layout("cosme-table"), None);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].entry.rating, Some(5.0));
    assert_eq!(items[0].entry.body_text, "刺激がない");
    assert_eq!(items[0].entry.posted_at, "2019年4月1日");
}

#[test]
fn detected_layout_parses_its_own_markup() {
    let set = LayoutSet::builtin().unwrap();
    let detected = set.detect(COSME_2024_PAGE).expect("layout detected");
    assert_eq!(detected.name(), "cosme-2024");
    assert_eq!(parse_listing(COSME_2024_PAGE, detected, None).len(), 2);
}

#[test]
fn date_keeps_internal_whitespace() {
    let markup = r#"
        <div class="review-sec">
          <p class="read">良い</p>
          <p class="date"> 2024/05/12  12:30 </p>
        </div>
    "#;
    let items = parse_listing(markup, &layout("cosme-2022"), None);
    assert_eq!(items[0].entry.posted_at, "2024/05/12  12:30");
}

#[test]
fn cosme_2024_excerpt_drops_inline_read_more_link() {
    let markup = r#"
        <div id="product-review-list">
          <div>
            <div class="body">
              <p>しっとり…<a class="read-more" href="/reviews/5/">続きを読む</a></p>
            </div>
          </div>
          <div>
            <div class="body">
              <p class="more"><a href="/reviews/6/">続きを読む</a></p>
              <p>さっぱり…</p>
            </div>
          </div>
        </div>
    "#;
    let items = parse_listing(markup, &layout("cosme-2024"), Some(&listing_url()));
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].entry.body_text, "しっとり…");
    assert_eq!(items[1].entry.body_text, "さっぱり…");
    assert_eq!(
        items[1].detail_link.as_deref(),
        Some("https://www.cosme.net/reviews/6/")
    );
}
