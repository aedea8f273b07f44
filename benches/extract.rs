use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hko_yesterday::{extract_from_html, merge_series};

// A page shaped like the real one: a weather table and a radiation table
// sharing a five-minute time grid.
fn synthetic_page(rows: usize) -> String {
    let mut weather = String::from(
        "<h3>Yesterday's Weather</h3><table>\
         <tr><th>Time</th><th>Air Temperature (&deg;C)</th><th>Relative Humidity (%)</th></tr>",
    );
    let mut radiation = String::from(
        "<h3>Radiation Level</h3><table>\
         <tr><th>Time</th><th>Radiation (&micro;Sv/h)</th></tr>",
    );
    for i in 0..rows {
        let minute = (i * 5) % (24 * 60);
        let time = format!("{:02}:{:02}", minute / 60, minute % 60);
        weather.push_str(&format!(
            "<tr><td>{time}</td><td>{:.1}</td><td>{}</td></tr>",
            20.0 + (i % 80) as f64 / 10.0,
            60 + i % 35,
        ));
        radiation.push_str(&format!(
            "<tr><td>{time}</td><td>{:.3}</td></tr>",
            0.10 + (i % 50) as f64 / 1000.0,
        ));
    }
    weather.push_str("</table>");
    radiation.push_str("</table>");
    format!("<html><body>{weather}{radiation}</body></html>")
}

fn bench_extract(c: &mut Criterion) {
    let html = synthetic_page(288);

    c.bench_function("extract_from_html", |b| {
        b.iter(|| extract_from_html(black_box(&html)))
    });

    c.bench_function("extract_and_merge", |b| {
        b.iter(|| {
            let extraction = extract_from_html(black_box(&html)).unwrap();
            merge_series(
                &extraction.temperature,
                &extraction.humidity,
                &extraction.radiation,
            )
        })
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
