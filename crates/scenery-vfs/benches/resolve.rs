use std::collections::HashMap;

use rand::SeedableRng;
use scenery_vfs::{DefinitionPath, Definition, Region};

criterion::criterion_group!(benches, resolve_large_index);
criterion::criterion_main!(benches);

const REGION_COUNT: usize = 64;
const PATHS_PER_REGION: usize = 256;
const OPTIONS_PER_BUCKET: usize = 8;

fn build_index() -> (Vec<Definition>, HashMap<String, Region>) {
	let mut regions = HashMap::new();

	for r in 0..REGION_COUNT {
		let lon_width = 360.0 / REGION_COUNT as f64;
		regions.insert(
			format!("region_{r}"),
			Region {
				north: 90.0,
				south: -90.0,
				west: -180.0 + r as f64 * lon_width,
				east: -180.0 + (r as f64 + 1.0) * lon_width,
				conditions: vec![],
			},
		);
	}

	let mut definitions = Vec::new();

	for r in 0..REGION_COUNT {
		for p in 0..PATHS_PER_REGION {
			let mut def = Definition::new(format!("lib/region_{r}/path_{p}.obj"));
			let rd = def.regional_def_mut(&format!("region_{r}"));

			for o in 0..OPTIONS_PER_BUCKET {
				rd.default.add(
					DefinitionPath::new("/pkg", format!("opt_{o}.obj"), true),
					1.0 + o as f64,
				);
			}

			definitions.push(def);
		}
	}

	definitions.sort_by(|a, b| a.virtual_path.cmp(&b.virtual_path));
	(definitions, regions)
}

fn resolve_large_index(crit: &mut criterion::Criterion) {
	let (definitions, regions) = build_index();
	let mut rng = rand::rngs::StdRng::seed_from_u64(0);

	let mut grp = crit.benchmark_group("resolve");

	grp.bench_function("binary_search_and_resolve", |bencher| {
		bencher.iter(|| {
			let idx = criterion::black_box(PATHS_PER_REGION / 2);
			let vpath = format!("lib/region_32/path_{idx}.obj");

			let def = definitions
				.binary_search_by(|d| d.virtual_path.as_str().cmp(vpath.as_str()))
				.ok()
				.map(|i| &definitions[i]);

			if let Some(def) = def {
				// '?' is the only season character that consults `default`/
				// `backup`, which is what `build_index` populates.
				criterion::black_box(def.resolve(&regions, 0.0, -180.0 + 32.5, '?', &mut rng));
			}
		});
	});

	grp.finish();
}
