// Static page template. Placeholders are `{{NAME}}` and are filled in one
// pass by `page::fill_template`.

pub const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<meta name="generator" content="citemap {{VERSION}}">
<title>{{TITLE}}</title>
<style>
  * { margin: 0; padding: 0; box-sizing: border-box; }
  body { background: #111; overflow: hidden; font-family: 'Segoe UI', sans-serif; }
  svg { width: 100vw; height: 100vh; cursor: grab; }
  svg:active { cursor: grabbing; }

  .edge { stroke: #444; stroke-width: 1px; transition: opacity 0.2s; }
  .edge.dimmed { opacity: 0.05; }

  .node-label { fill: white; text-anchor: middle; dominant-baseline: middle; pointer-events: none; user-select: none; }
  .node.dimmed circle { opacity: 0.08; }
  .node.dimmed text   { opacity: 0.08; }
  .node-highlight circle { stroke: {{COLOR_AUTHOR}} !important; stroke-width: 3px !important; }

  #tooltip {
    position: fixed; pointer-events: none; z-index: 3000;
    background: rgba(18,18,18,0.95); border: 1px solid rgba(255,255,255,0.15);
    border-radius: 6px; padding: 8px 12px; color: #eee; font-size: 12px;
    max-width: 220px; line-height: 1.4; display: none;
    box-shadow: 0 2px 8px rgba(0,0,0,0.5);
  }

  #controls {
    position: fixed; top: 16px; left: 16px; z-index: 2000;
    display: flex; flex-direction: column; gap: 10px; width: 300px;
  }

  #searchbox { display: flex; flex-direction: column; gap: 6px; }
  #searchbox input {
    width: 100%; padding: 9px 14px; border-radius: 8px;
    border: 1px solid rgba(255,255,255,0.2); background: rgba(20,20,20,0.95);
    color: #eee; font-size: 14px; outline: none;
  }
  #searchbox input:focus { border-color: {{COLOR_AUTHOR}}; }
  #search-results {
    background: rgba(18,18,18,0.97); border: 1px solid rgba(255,255,255,0.12);
    border-radius: 8px; max-height: 260px; overflow-y: auto; display: none;
  }
  .search-result-item {
    padding: 8px 14px; cursor: pointer; font-size: 13px; color: #ddd;
    border-bottom: 1px solid rgba(255,255,255,0.05); line-height: 1.4;
  }
  .search-result-item:hover { background: rgba(255,122,162,0.15); color: #fff; }
  .sr-type  { font-size: 10px; color: #888; text-transform: uppercase; margin-bottom: 2px; }
  .sr-label { font-weight: 600; }
  .sr-sub   { font-size: 11px; color: #aaa; margin-top: 2px; white-space: nowrap; overflow: hidden; text-overflow: ellipsis; }
  .no-results { padding: 10px 14px; color: #888; font-size: 13px; }

  .ctrl-card {
    background: rgba(18,18,18,0.95); border: 1px solid rgba(255,255,255,0.12);
    border-radius: 8px; padding: 12px 14px; display: flex; flex-direction: column; gap: 10px;
  }
  .ctrl-card label { font-size: 12px; color: #aaa; display: flex; align-items: center; gap: 8px; cursor: pointer; }
  .ctrl-card label input[type=checkbox] { accent-color: {{COLOR_AUTHOR}}; width: 14px; height: 14px; }
  .ctrl-title { font-size: 11px; color: #666; text-transform: uppercase; letter-spacing: 0.5px; margin-bottom: 2px; }

  .year-row { display: flex; align-items: center; gap: 8px; }
  .year-row input[type=range] { flex: 1; accent-color: {{COLOR_AUTHOR}}; }
  .year-val { font-size: 12px; color: #eee; min-width: 34px; text-align: center; }

  .btn-row { display: flex; gap: 8px; }
  .ctrl-btn {
    flex: 1; padding: 7px 10px; border-radius: 6px; border: 1px solid rgba(255,255,255,0.15);
    background: rgba(40,40,40,0.9); color: #eee; font-size: 12px; cursor: pointer;
    transition: background 0.15s;
  }
  .ctrl-btn:hover { background: rgba(255,122,162,0.2); border-color: {{COLOR_AUTHOR}}; }
  .ctrl-btn.active { background: rgba(255,122,162,0.25); border-color: {{COLOR_AUTHOR}}; color: {{COLOR_AUTHOR}}; }

  .stats-row { display: flex; gap: 6px; }
  .stat-box { flex: 1; background: rgba(30,30,30,0.8); border-radius: 6px; padding: 8px; text-align: center; }
  .stat-val { font-size: 18px; font-weight: 700; color: #fff; }
  .stat-lbl { font-size: 10px; color: #888; margin-top: 2px; }

  #sidepanel {
    position: fixed; top: 12px; right: 12px; width: 35%; max-width: 500px;
    height: calc(100vh - 24px); background: rgba(18,18,18,0.95);
    border: 1px solid rgba(255,255,255,0.15); border-radius: 8px;
    padding: 20px; overflow-y: auto; z-index: 1000; color: #eee;
    box-shadow: 0 4px 15px rgba(0,0,0,0.5); display: flex; flex-direction: column; gap: 8px;
  }
  #sidepanel h3 { margin: 0; color: #fff; border-bottom: 1px solid #444; padding-bottom: 10px; }
  .hint { font-style: italic; color: #888; font-size: 13px; }
  .apa-entry {
    padding-left: 24px; text-indent: -24px;
    font-size: 13px; line-height: 1.5; color: #ddd;
    border-bottom: 1px solid rgba(255,255,255,0.05);
    padding-bottom: 10px; margin-bottom: 6px; position: relative;
  }
  .apa-journal { font-style: italic; color: #aaa; }
  .apa-doi { color: {{COLOR_AUTHOR}}; text-decoration: none; word-break: break-all; }
  .apa-doi:hover { text-decoration: underline; }
  .copy-btn {
    display: inline-block; margin-top: 6px; margin-left: 0;
    padding: 3px 10px; font-size: 11px; border-radius: 4px;
    border: 1px solid rgba(255,122,162,0.4); background: transparent;
    color: {{COLOR_AUTHOR}}; cursor: pointer; text-indent: 0;
  }
  .copy-btn:hover { background: rgba(255,122,162,0.15); }
  .copy-toast {
    position: fixed; bottom: 24px; left: 50%; transform: translateX(-50%);
    background: {{COLOR_SUBTOPIC}}; color: #fff; padding: 8px 20px; border-radius: 20px;
    font-size: 13px; z-index: 9999; opacity: 0; transition: opacity 0.3s;
    pointer-events: none;
  }
</style>
</head>
<body>

<div id="tooltip"></div>
<div class="copy-toast" id="copy-toast">&#10003; APA copied to clipboard</div>

<div id="controls">
  <div id="searchbox">
    <input type="text" id="searchinput" placeholder="Search nodes or papers..." autocomplete="off" />
    <div id="search-results"></div>
  </div>

  <div class="ctrl-card">
    <div class="ctrl-title">Statistics</div>
    <div class="stats-row">
      <div class="stat-box"><div class="stat-val" id="stat-nodes">{{NODE_COUNT}}</div><div class="stat-lbl">Nodes</div></div>
      <div class="stat-box"><div class="stat-val" id="stat-edges">{{EDGE_COUNT}}</div><div class="stat-lbl">Edges</div></div>
      <div class="stat-box"><div class="stat-val" id="stat-visible">{{NODE_COUNT}}</div><div class="stat-lbl">Visible</div></div>
    </div>

    <div class="ctrl-title">Filter by type</div>
    <label><input type="checkbox" id="chk-subtopic" checked> <span style="color:{{COLOR_SUBTOPIC}}">&#9679;</span> Subtopics</label>
    <label><input type="checkbox" id="chk-author"   checked> <span style="color:{{COLOR_AUTHOR}}">&#9679;</span> Authors</label>
    <label><input type="checkbox" id="chk-other"    checked> <span style="color:{{COLOR_OTHER}}">&#9679;</span> Other</label>

    <div class="ctrl-title">Filter by publication year</div>
    <div class="year-row">
      <span class="year-val" id="year-from-lbl">{{MIN_YEAR}}</span>
      <input type="range" id="year-from" min="{{MIN_YEAR}}" max="{{MAX_YEAR}}" value="{{MIN_YEAR}}" step="1">
      <input type="range" id="year-to"   min="{{MIN_YEAR}}" max="{{MAX_YEAR}}" value="{{MAX_YEAR}}" step="1">
      <span class="year-val" id="year-to-lbl">{{MAX_YEAR}}</span>
    </div>

    <div class="btn-row">
      <button class="ctrl-btn" id="btn-reset">&#10227; Reset view</button>
      <button class="ctrl-btn" id="btn-neighbors">Neighbors</button>
    </div>
  </div>
</div>

<svg id="svg">
  <g id="zoom-group">
    <g id="edges-layer"></g>
    <g id="nodes-layer"></g>
  </g>
</svg>

<div id="sidepanel">
  <h3>Selected Node</h3>
  <div class="hint">Click a node to view details.</div>
</div>

<script src="{{D3_URL}}"></script>
<script>
const graphData = {{GRAPH_DATA}};
const GLOBAL_MIN_YEAR = {{MIN_YEAR}};
const GLOBAL_MAX_YEAR = {{MAX_YEAR}};

const svg = d3.select("#svg");
const g   = d3.select("#zoom-group");
const tip = document.getElementById("tooltip");

function esc(s) {
  return String(s ?? "").replace(/[&<>"']/g, c =>
    ({ "&": "&amp;", "<": "&lt;", ">": "&gt;", '"': "&quot;", "'": "&#39;" })[c]);
}

// Zoom & pan
const zoom = d3.zoom()
  .scaleExtent([0.05, 8])
  .on("zoom", e => g.attr("transform", e.transform));
svg.call(zoom);

let initTransform = d3.zoomIdentity;

// State
const nodePos = {};
graphData.nodes.forEach(n => { nodePos[n.id] = { x: n.x, y: n.y }; });

let neighborMode = false;
let selectedNodeId = null;
const kindEnabled = { subtopic: true, author: true, other: true };
let yearFrom = GLOBAL_MIN_YEAR, yearTo = GLOBAL_MAX_YEAR;

// Adjacency for neighbor mode, self loops excluded
const adjSet = {};
graphData.edges.forEach(e => {
  if (e.source === e.target) return;
  (adjSet[e.source] ??= new Set()).add(e.target);
  (adjSet[e.target] ??= new Set()).add(e.source);
});

// Edges
const edgeLines = d3.select("#edges-layer")
  .selectAll("line")
  .data(graphData.edges)
  .join("line")
  .attr("class", "edge")
  .attr("x1", d => nodePos[d.source]?.x ?? 0)
  .attr("y1", d => nodePos[d.source]?.y ?? 0)
  .attr("x2", d => nodePos[d.target]?.x ?? 0)
  .attr("y2", d => nodePos[d.target]?.y ?? 0);

// Nodes
const nodeG = d3.select("#nodes-layer")
  .selectAll("g.node")
  .data(graphData.nodes)
  .join("g")
  .attr("class", "node")
  .attr("transform", d => `translate(${nodePos[d.id].x}, ${nodePos[d.id].y})`)
  .style("cursor", "pointer")
  .on("click", (event, d) => {
    event.stopPropagation();
    selectedNodeId = d.id;
    showPanel(d);
    highlightNode(d.id);
    if (neighborMode) applyNeighborDim(d.id);
  })
  .on("mouseover", (event, d) => {
    tip.style.display = "block";
    tip.innerHTML = `<b>${esc(d.label)}</b><br><span style="color:#888;font-size:11px">${esc(d.type)}</span>` +
      (d.minYear ? `<br><span style="color:#aaa;font-size:11px">${d.minYear}&ndash;${d.maxYear ?? d.minYear}</span>` : "");
  })
  .on("mousemove", event => {
    tip.style.left = (event.clientX + 14) + "px";
    tip.style.top  = (event.clientY - 10) + "px";
  })
  .on("mouseout", () => { tip.style.display = "none"; });

nodeG.append("circle")
  .attr("r", d => d.radius)
  .attr("fill", d => d.color)
  .attr("stroke", "#222")
  .attr("stroke-width", 0.5);

nodeG.append("text")
  .attr("class", "node-label")
  .attr("font-size", d => d.fontSize)
  .text(d => d.label);

// Drag
const drag = d3.drag()
  .on("start", function(event) { event.sourceEvent.stopPropagation(); d3.select(this).raise(); })
  .on("drag", function(event, d) {
    nodePos[d.id].x += event.dx;
    nodePos[d.id].y += event.dy;
    d3.select(this).attr("transform", `translate(${nodePos[d.id].x}, ${nodePos[d.id].y})`);
    edgeLines.filter(e => e.source === d.id).attr("x1", nodePos[d.id].x).attr("y1", nodePos[d.id].y);
    edgeLines.filter(e => e.target === d.id).attr("x2", nodePos[d.id].x).attr("y2", nodePos[d.id].y);
  });
nodeG.call(drag);

// Side panel
const panel = document.getElementById("sidepanel");

function showPanel(d) {
  let html = `<h3>${esc(d.label)}</h3>`;
  if (d.type) html += `<div style="font-size:12px;color:#888;margin-bottom:8px">Type: ${esc(d.type)}</div>`;
  html += d.apa && d.apa.length > 0 ? d.apa : `<div class="hint">No citation data available.</div>`;
  panel.innerHTML = html;
}

svg.on("click", () => {
  panel.innerHTML = `<h3>Selected Node</h3><div class="hint">Click a node to view details.</div>`;
  clearHighlight();
  if (neighborMode) clearDim();
  selectedNodeId = null;
});

// Highlight
function highlightNode(id) {
  clearHighlight();
  nodeG.filter(d => d.id === id).classed("node-highlight", true);
}
function clearHighlight() { nodeG.classed("node-highlight", false); }

// Neighbor mode
function applyNeighborDim(id) {
  const neighbors = adjSet[id] || new Set();
  nodeG.classed("dimmed", d => d.id !== id && !neighbors.has(d.id));
  edgeLines.classed("dimmed", e => e.source !== id && e.target !== id);
}
function clearDim() {
  nodeG.classed("dimmed", false);
  edgeLines.classed("dimmed", false);
}

const btnNeighbors = document.getElementById("btn-neighbors");
btnNeighbors.addEventListener("click", () => {
  neighborMode = !neighborMode;
  btnNeighbors.classList.toggle("active", neighborMode);
  if (!neighborMode) { clearDim(); }
  else if (selectedNodeId) { applyNeighborDim(selectedNodeId); }
});

// Copy APA
panel.addEventListener("click", event => {
  const btn = event.target.closest(".copy-btn");
  if (!btn) return;
  navigator.clipboard.writeText(btn.dataset.apa).then(() => {
    const toast = document.getElementById("copy-toast");
    toast.style.opacity = "1";
    setTimeout(() => { toast.style.opacity = "0"; }, 2000);
  });
});

// Filters: undated nodes stay visible under any year range
function applyFilters() {
  const hiddenIds = new Set();
  let visible = 0;
  nodeG.each(function(d) {
    const typeOk = kindEnabled[d.kind] !== false;
    const yearOk = d.years.length === 0 || d.years.some(y => y >= yearFrom && y <= yearTo);
    const show = typeOk && yearOk;
    d3.select(this).style("display", show ? null : "none");
    if (show) visible++; else hiddenIds.add(d.id);
  });
  edgeLines.style("display", e => (hiddenIds.has(e.source) || hiddenIds.has(e.target)) ? "none" : null);
  document.getElementById("stat-visible").textContent = visible;
}

["subtopic", "author", "other"].forEach(kind => {
  document.getElementById(`chk-${kind}`).addEventListener("change", e => {
    kindEnabled[kind] = e.target.checked;
    applyFilters();
  });
});

// Dual-ended year range
const sliderFrom = document.getElementById("year-from");
const sliderTo   = document.getElementById("year-to");
const lblFrom    = document.getElementById("year-from-lbl");
const lblTo      = document.getElementById("year-to-lbl");

sliderFrom.addEventListener("input", () => {
  yearFrom = parseInt(sliderFrom.value, 10);
  if (yearFrom > yearTo) { yearTo = yearFrom; sliderTo.value = yearFrom; lblTo.textContent = yearFrom; }
  lblFrom.textContent = yearFrom;
  applyFilters();
});
sliderTo.addEventListener("input", () => {
  yearTo = parseInt(sliderTo.value, 10);
  if (yearTo < yearFrom) { yearFrom = yearTo; sliderFrom.value = yearTo; lblFrom.textContent = yearTo; }
  lblTo.textContent = yearTo;
  applyFilters();
});

// Reset view
document.getElementById("btn-reset").addEventListener("click", () => {
  svg.transition().duration(600).call(zoom.transform, initTransform);
});

// Fly to node
function flyTo(nodeData) {
  const W = window.innerWidth, H = window.innerHeight;
  const scale = 2.5;
  const tx = W / 2 - scale * nodePos[nodeData.id].x;
  const ty = H / 2 - scale * nodePos[nodeData.id].y;
  svg.transition().duration(600).call(zoom.transform, d3.zoomIdentity.translate(tx, ty).scale(scale));
  selectedNodeId = nodeData.id;
  showPanel(nodeData);
  highlightNode(nodeData.id);
  if (neighborMode) applyNeighborDim(nodeData.id);
}

// Search
const searchInput   = document.getElementById("searchinput");
const searchResults = document.getElementById("search-results");

searchInput.addEventListener("input", () => {
  const q = searchInput.value.trim().toLowerCase();
  if (!q) { searchResults.style.display = "none"; return; }
  const results = [];
  graphData.nodes.forEach(n => {
    if (n.label.toLowerCase().includes(q)) {
      results.push({ node: n, matchType: "node", snippet: "" });
    } else if (n.searchText && n.searchText.toLowerCase().includes(q)) {
      const parts = n.searchText.split(" | ");
      const matched = parts.find(p => p.toLowerCase().includes(q)) || "";
      results.push({ node: n, matchType: "paper", snippet: matched.substring(0, 80) });
    }
  });
  if (results.length === 0) {
    searchResults.innerHTML = `<div class="no-results">No results found.</div>`;
  } else {
    searchResults.innerHTML = results.slice(0, 30).map((r, i) => `
      <div class="search-result-item" data-idx="${i}">
        <div class="sr-type">${r.matchType === "node" ? "Node" : "Paper"}</div>
        <div class="sr-label">${esc(r.node.label)}</div>
        ${r.snippet ? `<div class="sr-sub">${esc(r.snippet)}</div>` : ""}
      </div>`).join("");
    searchResults.querySelectorAll(".search-result-item").forEach((el, i) => {
      el.addEventListener("click", () => {
        flyTo(results[i].node);
        searchResults.style.display = "none";
        searchInput.value = results[i].node.label;
      });
    });
  }
  searchResults.style.display = "block";
});

document.addEventListener("click", e => {
  if (!document.getElementById("searchbox").contains(e.target))
    searchResults.style.display = "none";
});

// Initial zoom to fit
if (graphData.nodes.length > 0) {
  const xs = graphData.nodes.map(n => n.x);
  const ys = graphData.nodes.map(n => n.y);
  const minX = Math.min(...xs), maxX = Math.max(...xs);
  const minY = Math.min(...ys), maxY = Math.max(...ys);
  const W = window.innerWidth, H = window.innerHeight;
  const span = Math.max((maxX - minX) / W, (maxY - minY) / H);
  const scale = span > 0 ? Math.min(8, 0.85 / span) : 1;
  const tx = W / 2 - scale * (minX + maxX) / 2;
  const ty = H / 2 - scale * (minY + maxY) / 2;
  initTransform = d3.zoomIdentity.translate(tx, ty).scale(scale);
}
svg.call(zoom.transform, initTransform);
</script>
</body>
</html>
"##;
