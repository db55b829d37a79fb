//! A small tour of the observable cell.

use tropism::Cell;

fn main() {
	// Observer panics end up here instead of crossing the write that
	// triggered them.
	let count = Cell::with_error_sink(0, |panic| {
		eprintln!("observer error: {panic}");
	});

	let mut subscription = count.subscribe(|value| println!("count changed: {value}"));

	// Reading never notifies.
	println!("current value: {}", count.get());

	count.set(5);
	count.update(|previous| previous + 10);

	{
		let _scoped = count.subscribe(|value| println!("scoped observer saw: {value}"));
		count.set(3);
	} // `_scoped` drops here and stops observing.

	count.set(10);

	subscription.unsubscribe();

	// No observers left: stores silently.
	count.set(1);
	println!("final value: {}", count.get());
}
