use std::path::Path;

pub fn run(root: &Path, port: u16) -> anyhow::Result<()> {
    let root = root.to_path_buf();
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let addr = format!("0.0.0.0:{port}");
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        let actual_port = listener.local_addr()?.port();
        println!("leadflow API on http://localhost:{actual_port}");
        leadflow_server::serve_on(root, listener).await
    })
}
