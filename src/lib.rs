/*!
cgql - typed command client for the CycleGraph command interpreter.

  protocol   intents, token vocabulary, encoder / decoder
  client     Dispatcher (one POST /execute per intent) + reqwest HttpClient
  session    persisted login state (`~/.cgql_config.json`)
  guard      route table and token check in front of every command

```no_run
use cgql::client::{ClientConfig, Dispatcher, HttpClient, parse_target};
use cgql::protocol::CycleQuery;

# async fn run() -> Result<(), Box<dyn std::error::Error>> {
let config = ClientConfig::new(parse_target("127.0.0.1:8000")?);
let dispatcher = Dispatcher::new(HttpClient::new(config)?);
let reply = dispatcher.query_cycles(CycleQuery::new("A", 3)).await?;
println!("{reply}");
# Ok(())
# }
```
*/

pub mod client;
pub mod guard;
pub mod protocol;
pub mod session;

pub use client::{DispatchError, Dispatcher, HttpClient};
pub use guard::{GuardError, Navigation};
pub use protocol::{CommandTokens, DecodeError, EncodeError, Intent};
pub use session::{FileSession, SessionError, SessionStore};
