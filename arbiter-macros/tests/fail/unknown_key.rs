use arbiter_macros::Handler;

#[derive(Handler)]
#[handler(event = Ping)]
struct PingHandler;

fn main() {
    let _ = PingHandler;
}
