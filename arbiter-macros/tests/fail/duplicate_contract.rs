use arbiter_macros::Handler;

struct Ping;

#[derive(Handler)]
#[handler(command = Ping, command = Ping)]
struct PingHandler;

fn main() {
    let _ = (Ping, PingHandler);
}
