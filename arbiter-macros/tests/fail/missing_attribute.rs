use arbiter_macros::Handler;

#[derive(Handler)]
struct Orphan;

fn main() {
    let _ = Orphan;
}
